// Scripted keystroke sessions
// Text scripts drive the demo page through the injector, one directive
// per line, so routing behavior can be replayed and inspected without
// a live host page

use std::fmt;

use log::{info, warn};

use softbreak_core::{
    FrameInjector, Key, KeyEvent, KeyRouter, Modifier, ModifierSet, NodeId, RouteOutcome,
    SendKeyProvider,
};

use crate::harness::ComposerPage;
use crate::settings::Settings;

/// One script directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Dispatch a keydown at the focused surface.
    Key(KeyEvent),
    Focus(FocusTarget),
    Popup(bool),
    MountFrame,
    ReloadConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Composer,
    Textarea,
    Frame,
}

/// Errors produced while parsing a script
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: unknown directive '{text}'")]
    UnknownDirective { line: usize, text: String },

    #[error("line {line}: unknown key or modifier '{text}'")]
    UnknownKey { line: usize, text: String },
}

/// Parses a script: one directive per line, `#` comments and blank
/// lines ignored.
pub fn parse(source: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        steps.push(parse_line(line, text)?);
    }
    Ok(steps)
}

fn parse_line(line: usize, text: &str) -> Result<Step, ScriptError> {
    let lowered = text.to_ascii_lowercase();
    let mut words = lowered.split_whitespace();
    let head = words.next().unwrap_or("");
    let rest = words.next();

    match (head, rest) {
        ("compose", Some(combo)) => {
            let event = parse_key_combo(line, combo)?;
            Ok(Step::Key(event.during_composition()))
        }
        ("focus", Some("composer")) => Ok(Step::Focus(FocusTarget::Composer)),
        ("focus", Some("textarea")) => Ok(Step::Focus(FocusTarget::Textarea)),
        ("focus", Some("frame")) => Ok(Step::Focus(FocusTarget::Frame)),
        ("popup", Some("show")) => Ok(Step::Popup(true)),
        ("popup", Some("hide")) => Ok(Step::Popup(false)),
        ("mount-frame", None) => Ok(Step::MountFrame),
        ("reload-config", None) => Ok(Step::ReloadConfig),
        (combo, None) if looks_like_key(combo) => Ok(Step::Key(parse_key_combo(line, combo)?)),
        _ => Err(ScriptError::UnknownDirective {
            line,
            text: text.to_string(),
        }),
    }
}

fn looks_like_key(word: &str) -> bool {
    word.contains('+') || is_key_name(word) || word.chars().count() == 1
}

fn is_key_name(word: &str) -> bool {
    matches!(word, "enter" | "tab" | "escape" | "esc" | "backspace")
}

/// `enter`, `ctrl+enter`, `ctrl+shift+enter`, or a single character.
fn parse_key_combo(line: usize, combo: &str) -> Result<KeyEvent, ScriptError> {
    let mut modifiers = ModifierSet::none();
    let mut key = None;
    for part in combo.split('+').filter(|p| !p.is_empty()) {
        match part {
            "enter" => key = Some(Key::Enter),
            "tab" => key = Some(Key::Tab),
            "escape" | "esc" => key = Some(Key::Escape),
            "backspace" => key = Some(Key::Backspace),
            "alt" => modifiers.insert(Modifier::Alt),
            "shift" => modifiers.insert(Modifier::Shift),
            "ctrl" => modifiers.insert(Modifier::Ctrl),
            "meta" => modifiers.insert(Modifier::Meta),
            single if single.chars().count() == 1 => {
                key = Some(Key::Char(single.chars().next().unwrap()));
            }
            other => {
                return Err(ScriptError::UnknownKey {
                    line,
                    text: other.to_string(),
                })
            }
        }
    }
    let key = key.ok_or_else(|| ScriptError::UnknownKey {
        line,
        text: combo.to_string(),
    })?;
    Ok(KeyEvent::with_modifiers(key, modifiers))
}

/// Result of one executed step, for the session report.
#[derive(Debug, Clone)]
pub struct StepReport {
    pub step: Step,
    pub outcome: Option<RouteOutcome>,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.step, self.outcome) {
            (Step::Key(event), Some(outcome)) => {
                write!(f, "{} -> {:?}", event, outcome.decision)
            }
            (step, _) => write!(f, "{:?}", step),
        }
    }
}

/// A running scripted session: demo page, injector, and the settings
/// store feeding the config provider.
pub struct Session {
    pub demo: ComposerPage,
    injector: FrameInjector,
    provider: SendKeyProvider,
    settings: Settings,
    focus: NodeId,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let provider = SendKeyProvider::new();
        provider.replace(settings.send_keys());
        let demo = ComposerPage::build();
        let injector = FrameInjector::start(&demo.page, KeyRouter::new(provider.clone()));
        let focus = demo.composer;
        Self {
            demo,
            injector,
            provider,
            settings,
            focus,
        }
    }

    /// Runs every step, logging each decision.
    pub fn run(&mut self, steps: &[Step]) -> Vec<StepReport> {
        steps.iter().map(|step| self.step(step)).collect()
    }

    pub fn step(&mut self, step: &Step) -> StepReport {
        let outcome = match step {
            Step::Key(event) => {
                let outcome =
                    self.injector
                        .dispatch_keydown(&mut self.demo.page, self.focus, event);
                info!("{} -> {:?}", event, outcome.decision);
                Some(outcome)
            }
            Step::Focus(target) => {
                self.focus = match target {
                    FocusTarget::Composer => self.demo.composer,
                    FocusTarget::Textarea => self.demo.textarea,
                    FocusTarget::Frame => match self.demo.embedded_textarea {
                        Some(node) => node,
                        None => {
                            warn!("embedded frame not mounted; focus stays put");
                            self.focus
                        }
                    },
                };
                None
            }
            Step::Popup(show) => {
                if *show {
                    self.demo.show_popup();
                } else {
                    self.demo.hide_popup();
                }
                None
            }
            Step::MountFrame => {
                self.demo.mount_embedded_frame();
                // The mutation watch fires between user events.
                self.injector.poll(&mut self.demo.page);
                None
            }
            Step::ReloadConfig => {
                match self.settings.reload() {
                    Ok(()) => self.provider.replace(self.settings.send_keys()),
                    Err(e) => warn!("config reload failed, keeping snapshot: {}", e),
                }
                None
            }
        };
        StepReport {
            step: step.clone(),
            outcome,
        }
    }

    /// Human-readable summary of what the session did to the page.
    pub fn summary(&self) -> String {
        let page = &self.demo.page;
        let mut out = String::new();

        if let Some(buffer) = page.text_buffer(self.demo.textarea) {
            out.push_str(&format!("textarea: {:?}\n", buffer.value));
        }
        out.push_str(&format!(
            "composer commands: {:?}\n",
            page.commands(self.demo.composer)
        ));
        if let Some(embedded) = self.demo.embedded_textarea {
            if let Some(buffer) = page.text_buffer(embedded) {
                out.push_str(&format!("embedded textarea: {:?}\n", buffer.value));
            }
        }
        out.push_str(&format!("clicks: {}\n", page.clicks().len()));
        out.push_str(&format!(
            "synthetic keydowns: {}\n",
            page.synthetic_events().len()
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use softbreak_core::RouteDecision;

    #[test]
    fn test_parse_key_lines() {
        let steps = parse("enter\nshift+enter\nctrl+shift+enter\n").unwrap();
        assert_eq!(steps[0], Step::Key(KeyEvent::new(Key::Enter)));
        assert_eq!(
            steps[1],
            Step::Key(KeyEvent::with_modifier(Key::Enter, Modifier::Shift))
        );
        let both = ModifierSet::only(Modifier::Ctrl).with(Modifier::Shift);
        assert_eq!(steps[2], Step::Key(KeyEvent::with_modifiers(Key::Enter, both)));
    }

    #[test]
    fn test_parse_directives_and_comments() {
        let source = "\
# warm up
popup show
focus textarea
enter
popup hide
mount-frame
reload-config
";
        let steps = parse(source).unwrap();
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[0], Step::Popup(true));
        assert_eq!(steps[1], Step::Focus(FocusTarget::Textarea));
        assert_eq!(steps[4], Step::MountFrame);
        assert_eq!(steps[5], Step::ReloadConfig);
    }

    #[test]
    fn test_parse_compose() {
        let steps = parse("compose enter").unwrap();
        assert_eq!(
            steps[0],
            Step::Key(KeyEvent::new(Key::Enter).during_composition())
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = parse("hover button").unwrap_err();
        assert!(matches!(err, ScriptError::UnknownDirective { line: 1, .. }));

        let err = parse("hyper+enter").unwrap_err();
        assert!(matches!(err, ScriptError::UnknownKey { .. }));
    }

    #[test]
    fn test_session_plain_enter_breaks_textarea() {
        let mut session = Session::new(Settings::new());
        let steps = parse("focus textarea\nenter").unwrap();
        let reports = session.run(&steps);

        assert_eq!(
            reports[1].outcome.map(|o| o.decision),
            Some(RouteDecision::LineBreak)
        );
        assert_eq!(
            session
                .demo
                .page
                .text_buffer(session.demo.textarea)
                .unwrap()
                .value,
            "\n"
        );
    }

    #[test]
    fn test_session_popup_passthrough() {
        let mut session = Session::new(Settings::new());
        let steps = parse("popup show\nenter\npopup hide\nenter").unwrap();
        let reports = session.run(&steps);

        assert_eq!(
            reports[1].outcome.map(|o| o.decision),
            Some(RouteDecision::Passthrough)
        );
        assert_eq!(
            reports[3].outcome.map(|o| o.decision),
            Some(RouteDecision::LineBreak)
        );
    }

    #[test]
    fn test_session_ctrl_enter_clicks_send() {
        let mut session = Session::new(Settings::new());
        let steps = parse("ctrl+enter").unwrap();
        session.run(&steps);
        assert_eq!(session.demo.page.clicks(), &[session.demo.send_button]);
    }

    #[test]
    fn test_session_mount_frame_then_type() {
        let mut session = Session::new(Settings::new());
        let steps = parse("mount-frame\nfocus frame\nenter").unwrap();
        let reports = session.run(&steps);
        assert_eq!(
            reports[2].outcome.map(|o| o.decision),
            Some(RouteDecision::LineBreak)
        );
        let embedded = session.demo.embedded_textarea.unwrap();
        assert_eq!(
            session.demo.page.text_buffer(embedded).unwrap().value,
            "\n"
        );
    }
}
