// Input configuration and remapping system

use super::mask::ButtonMask;
use super::system::{button_names, parse_buttons, System};
use super::InputError;
use bitflags::Flags;
use std::collections::HashMap;

/// Input configuration for a single player
/// Maps input sources (skin regions, keys, script names) to core buttons.
/// A source may be bound to a chord of several buttons.
#[derive(Debug, Clone)]
pub struct InputConfig<S: System> {
    /// Player ID this config is for
    player_id: usize,

    /// Mapping from input sources to buttons
    bindings: HashMap<String, S::Buttons>,

    /// Reverse mapping for quick lookups (buttons -> all sources)
    button_to_sources: HashMap<S::Buttons, Vec<String>>,
}

impl<S: System> InputConfig<S> {
    /// Create a new input configuration
    pub fn new(player_id: usize) -> Self {
        Self {
            player_id,
            bindings: HashMap::new(),
            button_to_sources: HashMap::new(),
        }
    }

    /// Create a configuration from a list of bindings
    pub fn from_bindings<I, K>(player_id: usize, bindings: I) -> Self
    where
        I: IntoIterator<Item = (K, S::Buttons)>,
        K: Into<String>,
    {
        let mut config = Self::new(player_id);
        for (source, buttons) in bindings {
            config.bind(source, buttons);
        }
        config
    }

    /// Parse `source = system.button` lines. Blank lines and `#` comments are skipped.
    /// A chord is written `source = system.a | system.b`.
    pub fn parse(player_id: usize, text: &str) -> Result<Self, InputError> {
        let mut config = Self::new(player_id);
        for (index, raw) in text.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            let malformed = || InputError::MalformedBinding {
                line: index + 1,
                text: raw.trim().to_string(),
            };
            let (source, buttons) = line.split_once('=').ok_or_else(malformed)?;
            let (source, buttons) = (source.trim(), buttons.trim());
            if source.is_empty() || buttons.is_empty() {
                return Err(malformed());
            }

            config.bind(source, parse_buttons::<S>(buttons)?);
        }

        log::debug!(
            "Loaded {} {} bindings for player {}",
            config.bindings.len(),
            S::NAME,
            player_id
        );
        Ok(config)
    }

    /// Get the player ID
    pub fn player_id(&self) -> usize {
        self.player_id
    }

    /// Bind an input source to one button or a chord
    pub fn bind(&mut self, source: impl Into<String>, buttons: S::Buttons) {
        let source = source.into();

        // Remove any existing binding for this source
        self.unbind_source(&source);

        self.button_to_sources
            .entry(buttons)
            .or_default()
            .push(source.clone());
        self.bindings.insert(source, buttons);
    }

    /// Unbind an input source
    pub fn unbind_source(&mut self, source: &str) {
        if let Some(buttons) = self.bindings.remove(source) {
            if let Some(sources) = self.button_to_sources.get_mut(&buttons) {
                sources.retain(|s| s != source);
                if sources.is_empty() {
                    self.button_to_sources.remove(&buttons);
                }
            }
        }
    }

    /// Unbind all sources bound to exactly `buttons`
    pub fn unbind_button(&mut self, buttons: S::Buttons) {
        if let Some(sources) = self.button_to_sources.remove(&buttons) {
            for source in sources {
                self.bindings.remove(&source);
            }
        }
    }

    /// Get the buttons bound to an input source
    pub fn button_for(&self, source: &str) -> Option<S::Buttons> {
        self.bindings.get(source).copied()
    }

    /// Fold several sources into one set, skipping unbound ones
    pub fn mask_for<'s>(&self, sources: impl IntoIterator<Item = &'s str>) -> S::Buttons {
        sources
            .into_iter()
            .filter_map(|source| self.button_for(source))
            .map(Into::<ButtonMask>::into)
            .fold(ButtonMask::empty(), |mask, buttons| mask | buttons)
            .truncate_to()
    }

    /// Get all input sources bound to exactly `buttons`
    pub fn sources_for(&self, buttons: S::Buttons) -> Vec<String> {
        self.button_to_sources
            .get(&buttons)
            .cloned()
            .unwrap_or_default()
    }

    /// Check if an input source is bound to any button
    pub fn is_bound(&self, source: &str) -> bool {
        self.bindings.contains_key(source)
    }

    /// Check if a button has any bindings
    pub fn has_binding(&self, buttons: S::Buttons) -> bool {
        self.button_to_sources.contains_key(&buttons)
    }

    /// Get all bindings as a list
    pub fn bindings(&self) -> Vec<(String, S::Buttons)> {
        self.bindings
            .iter()
            .map(|(source, buttons)| (source.clone(), *buttons))
            .collect()
    }

    /// Clear all bindings
    pub fn clear(&mut self) {
        self.bindings.clear();
        self.button_to_sources.clear();
    }

    /// Reset to default bindings: every button answers to its own identifier
    pub fn reset_to_defaults(&mut self) {
        self.clear();
        for (_, button) in <S::Buttons as Flags>::all().iter_names() {
            self.bind(button_names::<S>(button), button);
        }
    }
}

impl<S: System> Default for InputConfig<S> {
    fn default() -> Self {
        let mut config = Self::new(0);
        config.reset_to_defaults();
        config
    }
}
