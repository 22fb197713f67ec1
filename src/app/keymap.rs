use anyhow::{Context, Result, anyhow, bail};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

const DEFAULT_KEYMAP: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/keymap/default.keymap.json"
));

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeymapContext {
    Form,
    Popup,
}

impl KeymapContext {
    fn from_str(raw: &str) -> Option<Self> {
        match raw {
            "form" => Some(KeymapContext::Form),
            "popup" => Some(KeymapContext::Popup),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Submit,
    Reset,
    Quit,
    FocusStep(i32),
    Activate,
    Clear,
    DateStep(i64),
    PopupStep(i32),
    Dismiss,
}

#[derive(Deserialize)]
struct RawEntry {
    id: String,
    description: String,
    contexts: Vec<String>,
    action: RawAction,
    combos: Vec<String>,
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum RawAction {
    Submit,
    Reset,
    Quit,
    FocusStep { delta: i32 },
    Activate,
    Clear,
    DateStep { delta: i64 },
    PopupStep { delta: i32 },
    Dismiss,
}

impl From<RawAction> for KeyAction {
    fn from(raw: RawAction) -> Self {
        match raw {
            RawAction::Submit => KeyAction::Submit,
            RawAction::Reset => KeyAction::Reset,
            RawAction::Quit => KeyAction::Quit,
            RawAction::FocusStep { delta } => KeyAction::FocusStep(delta),
            RawAction::Activate => KeyAction::Activate,
            RawAction::Clear => KeyAction::Clear,
            RawAction::DateStep { delta } => KeyAction::DateStep(delta),
            RawAction::PopupStep { delta } => KeyAction::PopupStep(delta),
            RawAction::Dismiss => KeyAction::Dismiss,
        }
    }
}

#[derive(Debug, Clone)]
struct KeyBinding {
    action: KeyAction,
    contexts: Vec<KeymapContext>,
    combos: Vec<KeyPattern>,
    snippet: String,
}

impl KeyBinding {
    fn from_raw(raw: RawEntry) -> Result<Self> {
        let contexts = raw
            .contexts
            .iter()
            .filter_map(|ctx| KeymapContext::from_str(ctx))
            .collect::<Vec<_>>();
        if contexts.is_empty() {
            bail!("keymap entry {} must declare at least one context", raw.id);
        }
        let combos = raw
            .combos
            .iter()
            .map(|combo| {
                KeyPattern::parse(combo)
                    .with_context(|| format!("failed to parse combo '{combo}' for {}", raw.id))
            })
            .collect::<Result<Vec<_>>>()?;
        if combos.is_empty() {
            bail!("keymap entry {} must declare combos", raw.id);
        }
        let combos_display = combos
            .iter()
            .map(|pattern| pattern.display.as_str())
            .collect::<Vec<_>>()
            .join("/");
        Ok(Self {
            action: raw.action.into(),
            contexts,
            snippet: format!("{combos_display} {}", raw.description),
            combos,
        })
    }

    fn matches(&self, key: &KeyEvent, context: KeymapContext) -> Option<KeyAction> {
        if !self.contexts.contains(&context) {
            return None;
        }
        self.combos
            .iter()
            .any(|pattern| pattern.matches(key))
            .then_some(self.action)
    }
}

#[derive(Debug, Clone)]
struct KeyPattern {
    matcher: CodeMatcher,
    required: KeyModifiers,
    allow_shift: bool,
    display: String,
}

impl KeyPattern {
    fn parse(spec: &str) -> Result<Self> {
        let display = spec.trim().to_string();
        let mut tokens = display
            .split('+')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .collect::<Vec<_>>();
        let key_token = tokens.pop().ok_or_else(|| anyhow!("combo must contain a key"))?;
        let mut required = KeyModifiers::empty();
        for token in tokens {
            match token.to_lowercase().as_str() {
                "ctrl" | "control" => required |= KeyModifiers::CONTROL,
                "shift" => required |= KeyModifiers::SHIFT,
                "alt" => required |= KeyModifiers::ALT,
                other => bail!("unsupported modifier '{other}'"),
            }
        }
        let mut matcher = CodeMatcher::from_token(key_token)?;
        // Terminals report Shift+Tab as BackTab, sometimes with SHIFT set.
        if matches!(matcher, CodeMatcher::Literal(KeyCode::Tab))
            && required.contains(KeyModifiers::SHIFT)
        {
            matcher = CodeMatcher::Literal(KeyCode::BackTab);
            required.remove(KeyModifiers::SHIFT);
        }
        let allow_shift = matcher.allows_extra_shift() && !required.contains(KeyModifiers::SHIFT);
        Ok(Self {
            matcher,
            required,
            allow_shift,
            display,
        })
    }

    fn matches(&self, key: &KeyEvent) -> bool {
        if !self.matcher.matches(&key.code) || !key.modifiers.contains(self.required) {
            return false;
        }
        let extra = key.modifiers - self.required;
        if self.allow_shift {
            (extra - KeyModifiers::SHIFT).is_empty()
        } else {
            extra.is_empty()
        }
    }
}

#[derive(Debug, Clone)]
enum CodeMatcher {
    Literal(KeyCode),
    Alpha(char),
}

impl CodeMatcher {
    fn from_token(token: &str) -> Result<Self> {
        let normalized = token.to_lowercase();
        let matcher = match normalized.as_str() {
            "tab" => CodeMatcher::Literal(KeyCode::Tab),
            "backtab" => CodeMatcher::Literal(KeyCode::BackTab),
            "enter" => CodeMatcher::Literal(KeyCode::Enter),
            "esc" | "escape" => CodeMatcher::Literal(KeyCode::Esc),
            "left" => CodeMatcher::Literal(KeyCode::Left),
            "right" => CodeMatcher::Literal(KeyCode::Right),
            "up" => CodeMatcher::Literal(KeyCode::Up),
            "down" => CodeMatcher::Literal(KeyCode::Down),
            "delete" | "del" => CodeMatcher::Literal(KeyCode::Delete),
            "backspace" => CodeMatcher::Literal(KeyCode::Backspace),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => CodeMatcher::Alpha(ch),
                    _ => bail!("unsupported key '{token}'"),
                }
            }
        };
        Ok(matcher)
    }

    fn matches(&self, code: &KeyCode) -> bool {
        match (self, code) {
            (CodeMatcher::Literal(expected), actual) => actual == expected,
            (CodeMatcher::Alpha(expected), KeyCode::Char(actual)) => {
                actual.to_ascii_lowercase() == *expected
            }
            _ => false,
        }
    }

    fn allows_extra_shift(&self) -> bool {
        matches!(
            self,
            CodeMatcher::Alpha(_) | CodeMatcher::Literal(KeyCode::BackTab)
        )
    }
}

/// Key bindings loaded from a JSON keymap document.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<KeyBinding>,
}

impl Keymap {
    pub fn parse(source: &str) -> Result<Self> {
        let raw_entries: Vec<RawEntry> =
            serde_json::from_str(source).context("failed to parse keymap")?;
        let bindings = raw_entries
            .into_iter()
            .map(KeyBinding::from_raw)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { bindings })
    }

    /// The keymap shipped in `keymap/default.keymap.json`.
    pub fn builtin() -> Result<Self> {
        Self::parse(DEFAULT_KEYMAP).context("invalid built-in keymap")
    }

    pub fn resolve(&self, key: &KeyEvent, context: KeymapContext) -> Option<KeyAction> {
        self.bindings
            .iter()
            .find_map(|binding| binding.matches(key, context))
    }

    pub fn help_text(&self, context: KeymapContext) -> Option<String> {
        let mut snippets: Vec<&str> = Vec::new();
        for binding in &self.bindings {
            if binding.contexts.contains(&context) && !snippets.contains(&binding.snippet.as_str())
            {
                snippets.push(&binding.snippet);
            }
        }
        if snippets.is_empty() {
            None
        } else {
            Some(snippets.join(" • "))
        }
    }
}
