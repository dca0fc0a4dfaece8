//! `theme`: color scheme, prompt style, and font preferences.

use arcade_shell_contract::{ArgBounds, CommandOutcome, ShellError, SideEffects};
use catalog_host::{load_pref_with, save_pref_with, PrefsStore};

use super::{descriptor, CommandRegistration};
use crate::{
    dispatch::CommandContext,
    registry::command_handler,
    text::{pad_right, rule},
};

const DEFAULT_CHOICE: &str = "default";
const FONT_SIZE_KEY: &str = "terminal_font_size";

struct Choice {
    name: &'static str,
    display_name: &'static str,
    description: &'static str,
}

const fn choice(
    name: &'static str,
    display_name: &'static str,
    description: &'static str,
) -> Choice {
    Choice {
        name,
        display_name,
        description,
    }
}

const SCHEMES: &[Choice] = &[
    choice("default", "Default Terminal", "Classic terminal colors"),
    choice("matrix", "Matrix Green", "Green on black Matrix style"),
    choice("cyberpunk", "Cyberpunk Neon", "Cyan and magenta neon colors"),
    choice("dracula", "Dracula Dark", "Popular Dracula theme palette"),
    choice("monokai", "Monokai Pro", "Classic Monokai editor theme"),
    choice("amber", "Amber Retro", "Vintage amber monochrome terminal"),
    choice("gruvbox", "Gruvbox Dark", "Retro groove color scheme"),
    choice("nord", "Nord Polar", "Arctic inspired palette"),
    choice("material-dark", "Material Dark", "Google Material Design dark theme"),
    choice("solarized-dark", "Solarized Dark", "Classic developer color scheme"),
    choice("one-dark", "One Dark", "Popular Atom/VS Code theme"),
    choice("tokyo-night", "Tokyo Night", "Modern Japanese neon aesthetic"),
    choice("synthwave-84", "Synthwave '84", "Retrowave/Outrun 80s style"),
    choice("rose-pine", "Rose Pine", "Elegant minimalist theme"),
];

const PROMPTS: &[Choice] = &[
    choice("default", "Default", "Standard user@host:path$ format"),
    choice("minimal", "Minimal", "Clean > prompt"),
    choice("powerline", "Powerline", "Styled with powerline separators"),
    choice("arrow", "Arrow", "Simple arrow prompt \u{2192}"),
    choice("retro", "Retro", "C:\\> style DOS prompt"),
    choice("fish", "Fish", "Fish shell style prompt"),
    choice("zsh", "Zsh", "Oh-my-zsh style with git info"),
    choice("hacker", "Hacker", "Matrix-style hacker prompt"),
    choice("root", "Root", "Superuser/admin style prompt"),
    choice("unix", "Unix", "Classic Unix/BSD style prompt"),
    choice("session", "Session", "Interactive console with session info"),
    choice("clock", "Clock", "Shows current time in prompt"),
    choice("date", "Date", "Shows current date in prompt"),
    choice("geometric", "Geometric", "Styled with \u{25e2}\u{25e4}\u{25e5}\u{25e3} geometric symbols"),
];

const FONTS: &[Choice] = &[
    choice("default", "Default Mono", "System default monospace font"),
    choice("dotgothic16", "Dot Gothic 16", "Pixel-style gothic font"),
    choice("firacode", "Fira Code", "Developer font with ligatures"),
    choice("pressstart2p", "Press Start 2P", "Classic 8-bit arcade font"),
    choice("spacemono", "Space Mono", "Fixed-width typewriter style"),
    choice("specialelite", "Special Elite", "Vintage typewriter aesthetic"),
    choice("synemono", "Syne Mono", "Modern geometric monospace"),
    choice("vt323", "VT323", "Classic CRT terminal font"),
    choice("terminus", "Terminus", "Clean bitmap font for terminals"),
    choice("ubuntumono", "Ubuntu Mono", "Ubuntu's monospace companion font"),
    choice("cascadiacode", "Cascadia Code", "Microsoft's coding font with ligatures"),
    choice("ibmplexmono", "IBM Plex Mono", "IBM's modern monospace typeface"),
];

#[derive(Clone, Copy)]
enum Reload {
    Theme,
    Prompt,
    Font,
}

impl Reload {
    fn side_effects(self) -> SideEffects {
        let mut effects = SideEffects::default();
        match self {
            Self::Theme => effects.reload_theme = true,
            Self::Prompt => effects.reload_prompt = true,
            Self::Font => effects.reload_font = true,
        }
        effects
    }
}

/// One persisted preference and the wording used to manage it.
struct Setting {
    key: &'static str,
    choices: &'static [Choice],
    name_width: usize,
    /// Word used in messages, e.g. `"color scheme"`.
    noun: &'static str,
    /// Capitalized form for change and reset messages.
    title_noun: &'static str,
    /// What a missing `set` argument is called.
    name_noun: &'static str,
    /// Subcommand group word for `theme <group> ...` errors.
    group: &'static str,
    list_heading: &'static str,
    current_heading: &'static str,
    /// Subcommand prefix for hints, e.g. `"theme prompt"`.
    command: &'static str,
    placeholder: &'static str,
    plural_noun: &'static str,
    /// Label used when the stored value is not in `choices`.
    fallback_label: &'static str,
    reload: Reload,
}

const SCHEME: Setting = Setting {
    key: "terminal_color_scheme",
    choices: SCHEMES,
    name_width: 16,
    noun: "color scheme",
    title_noun: "Color scheme",
    name_noun: "scheme",
    group: "theme",
    list_heading: "AVAILABLE COLOR SCHEMES",
    current_heading: "CURRENT SETTINGS",
    command: "theme",
    placeholder: "scheme",
    plural_noun: "schemes",
    fallback_label: "Scheme",
    reload: Reload::Theme,
};

const PROMPT: Setting = Setting {
    key: "terminal_prompt_style",
    choices: PROMPTS,
    name_width: 12,
    noun: "prompt style",
    title_noun: "Prompt style",
    name_noun: "prompt style",
    group: "prompt",
    list_heading: "AVAILABLE PROMPT STYLES",
    current_heading: "CURRENT PROMPT STYLE",
    command: "theme prompt",
    placeholder: "style",
    plural_noun: "styles",
    fallback_label: "Style",
    reload: Reload::Prompt,
};

const FONT: Setting = Setting {
    key: "terminal_font",
    choices: FONTS,
    name_width: 14,
    noun: "font",
    title_noun: "Font",
    name_noun: "font",
    group: "font",
    list_heading: "AVAILABLE FONTS",
    current_heading: "CURRENT FONT",
    command: "theme font",
    placeholder: "font",
    plural_noun: "fonts",
    fallback_label: "Font",
    reload: Reload::Font,
};

impl Setting {
    fn find(&self, name: &str) -> Option<&'static Choice> {
        self.choices.iter().find(|choice| choice.name == name)
    }

    fn current(&self, store: &dyn PrefsStore) -> String {
        match load_pref_with::<_, String>(store, self.key) {
            Ok(value) => value.unwrap_or_else(|| DEFAULT_CHOICE.to_string()),
            Err(err) => {
                tracing::warn!(key = self.key, error = %err, "failed to read theme setting");
                DEFAULT_CHOICE.to_string()
            }
        }
    }

    fn store(&self, store: &dyn PrefsStore, value: &str) -> Result<(), ShellError> {
        save_pref_with(store, self.key, value).map_err(|err| {
            ShellError::operational(format!("Failed to save {}: {err}", self.noun))
        })
    }

    fn list(&self, store: &dyn PrefsStore) -> Vec<String> {
        let current = self.current(store);
        let mut lines = vec![self.list_heading.to_string(), rule('=', 40), String::new()];
        for choice in self.choices {
            let marker = if choice.name == current { " [*]" } else { "    " };
            lines.push(format!(
                "{marker}{} - {}",
                pad_right(choice.name, self.name_width),
                choice.display_name
            ));
            lines.push(format!("       {}", choice.description));
        }
        lines.push(String::new());
        lines.push(format!("Current {}: {current}", self.noun));
        lines.push(format!(
            "Use '{} set <{}>' to change",
            self.command, self.placeholder
        ));
        lines
    }

    /// `Name`/`ID`/`Desc` lines for the stored choice, or `<label>: <value>` when unknown.
    fn describe(&self, current: &str, with_description: bool) -> Vec<String> {
        match self.find(current) {
            Some(choice) => {
                let mut lines = vec![
                    format!("Name: {}", choice.display_name),
                    format!("ID:   {}", choice.name),
                ];
                if with_description {
                    lines.push(format!("Desc: {}", choice.description));
                }
                lines
            }
            None => vec![format!("{}: {current}", self.fallback_label)],
        }
    }

    fn reset(&self, store: &dyn PrefsStore) -> Result<CommandOutcome, ShellError> {
        self.store(store, DEFAULT_CHOICE)?;
        Ok(CommandOutcome::lines([
            format!("{} reset to default", self.title_noun),
            "Changes applied immediately!".to_string(),
        ])
        .with_side_effects(self.reload.side_effects()))
    }

    fn set(
        &self,
        store: &dyn PrefsStore,
        name: Option<&str>,
    ) -> Result<CommandOutcome, ShellError> {
        let Some(name) = name else {
            return Err(ShellError::usage(format!(
                "Error: {} name required\nUsage: {} set <{}>\nUse '{} list' to see available {}",
                self.name_noun,
                self.command,
                self.placeholder,
                self.command,
                self.plural_noun
            )));
        };
        let name = name.to_lowercase();
        let Some(choice) = self.find(&name) else {
            return Err(ShellError::not_found(format!(
                "Error: {} '{name}' not found\nUse '{} list' to see available {}",
                self.noun, self.command, self.plural_noun
            )));
        };
        self.store(store, choice.name)?;
        tracing::debug!(key = self.key, value = choice.name, "theme setting changed");
        Ok(CommandOutcome::lines([
            format!("{} changed to: {}", self.title_noun, choice.display_name),
            "Changes applied immediately!".to_string(),
        ])
        .with_side_effects(self.reload.side_effects()))
    }
}

pub(crate) fn theme_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "theme",
            &["colors", "scheme"],
            ArgBounds::between(0, 4),
            vec![],
            "Manage terminal theme, color schemes, prompt styles and fonts",
            "theme [list|set <scheme>|prompt [list|set <style>|current|reset]|font [list|set <font>|current|reset]|current|reset]",
        ),
        handler: command_handler(run_theme),
    }
}

fn run_theme(ctx: &CommandContext<'_>) -> Result<CommandOutcome, ShellError> {
    let store = ctx.shell.store.as_ref();
    let Some(subcommand) = ctx.arg(0).map(str::to_lowercase) else {
        return Ok(CommandOutcome::lines(overview()));
    };

    match subcommand.as_str() {
        "prompt" => sub_setting(ctx, &PROMPT),
        "font" => sub_setting(ctx, &FONT),
        "list" | "ls" => Ok(CommandOutcome::lines(SCHEME.list(store))),
        "current" | "show" => Ok(CommandOutcome::lines(current_settings(store))),
        "reset" => match ctx.arg(1).map(str::to_lowercase).as_deref() {
            Some("prompt") => PROMPT.reset(store),
            Some("font") => FONT.reset(store),
            _ => SCHEME.reset(store),
        },
        "set" => SCHEME.set(store, ctx.arg(1)),
        other => Err(ShellError::usage(format!(
            "Error: unknown subcommand '{other}'\nUse 'theme' without arguments for help"
        ))),
    }
}

/// `theme prompt ...` and `theme font ...`.
fn sub_setting(ctx: &CommandContext<'_>, setting: &Setting) -> Result<CommandOutcome, ShellError> {
    let store = ctx.shell.store.as_ref();
    let Some(action) = ctx.arg(1).map(str::to_lowercase) else {
        return Err(ShellError::usage(format!(
            "Error: {} subcommand required\nUsage: {} [list|set <{}>|current|reset]",
            setting.group,
            setting.command,
            setting.placeholder
        )));
    };

    match action.as_str() {
        "list" | "ls" => Ok(CommandOutcome::lines(setting.list(store))),
        "current" | "show" => {
            let current = setting.current(store);
            let mut lines = vec![setting.current_heading.to_string(), rule('=', 40), String::new()];
            lines.extend(setting.describe(&current, true));
            if setting.key == PROMPT.key && setting.find(&current).is_some() {
                lines.push(format!(
                    "Example: {}",
                    prompt_example(&current, &ctx.shell.user())
                ));
            }
            if setting.key == FONT.key {
                let size = load_pref_with::<_, serde_json::Value>(store, FONT_SIZE_KEY);
                if let Ok(Some(size)) = size {
                    lines.push(format!("Size: {size}"));
                }
            }
            Ok(CommandOutcome::lines(lines))
        }
        "reset" => setting.reset(store),
        "set" => setting.set(store, ctx.arg(2)),
        other => Err(ShellError::usage(format!(
            "Error: unknown {} subcommand '{other}'\nUse '{}' for help",
            setting.group,
            setting.command
        ))),
    }
}

fn prompt_example(style: &str, user: &str) -> String {
    match style {
        "minimal" => "[Documents] > ".to_string(),
        "arrow" => "\u{2192} ".to_string(),
        "retro" => format!("C:\\Users\\{user}\\Documents>"),
        "hacker" => format!("root@{user}:/11010101# "),
        _ => format!("{user}@pegasus:~/Documents$ "),
    }
}

fn current_settings(store: &dyn PrefsStore) -> Vec<String> {
    let mut lines = vec![
        SCHEME.current_heading.to_string(),
        rule('=', 40),
        String::new(),
        "COLOR SCHEME".to_string(),
        rule('-', 40),
    ];
    lines.extend(SCHEME.describe(&SCHEME.current(store), true));
    lines.push(String::new());
    lines.push("PROMPT STYLE".to_string());
    lines.push(rule('-', 40));
    lines.extend(PROMPT.describe(&PROMPT.current(store), false));
    lines.push(String::new());
    lines.push("FONT".to_string());
    lines.push(rule('-', 40));
    lines.extend(FONT.describe(&FONT.current(store), false));
    lines
}

fn overview() -> Vec<String> {
    [
        "THEME MANAGER",
        "========================================",
        "",
        "Usage:",
        "  theme list                    - List available color schemes",
        "  theme set <scheme>            - Set active color scheme",
        "  theme current                 - Show current settings",
        "  theme reset                   - Reset color scheme to default",
        "",
        "  theme prompt list             - List available prompt styles",
        "  theme prompt set <style>      - Set prompt style",
        "  theme prompt current          - Show current prompt style",
        "  theme prompt reset            - Reset prompt to default style",
        "",
        "  theme font list               - List available fonts",
        "  theme font set <font>         - Set terminal font",
        "  theme font current            - Show current font",
        "  theme font reset              - Reset font to default",
        "",
        "Examples:",
        "  theme set cyberpunk           - Change to Cyberpunk color scheme",
        "  theme prompt set arrow        - Change to arrow prompt style",
        "  theme font set vt323          - Change to VT323 retro font",
        "  theme font set pressstart2p   - Change to 8-bit arcade font",
        "",
        "Aliases: colors, scheme",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
    use catalog_host::MemoryPrefsStore;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn set_stores_canonical_name_and_requests_reload() {
        let store = MemoryPrefsStore::default();
        let outcome = PROMPT.set(&store, Some("ARROW")).expect("set prompt");
        assert_eq!(
            outcome.stdout,
            vec!["Prompt style changed to: Arrow", "Changes applied immediately!"]
        );
        assert!(outcome.side_effects.reload_prompt);
        assert_eq!(PROMPT.current(&store), "arrow");
        assert_eq!(
            store.load_pref("terminal_prompt_style").expect("load"),
            Some("\"arrow\"".to_string())
        );
    }

    #[test]
    fn unknown_choice_is_rejected_without_writing() {
        let store = MemoryPrefsStore::default();
        let err = SCHEME.set(&store, Some("neon")).expect_err("unknown scheme");
        assert_eq!(
            err.message,
            "Error: color scheme 'neon' not found\nUse 'theme list' to see available schemes"
        );
        assert!(store.keys().is_empty());
    }

    #[test]
    fn missing_name_reports_usage() {
        let store = MemoryPrefsStore::default();
        let err = FONT.set(&store, None).expect_err("missing font");
        assert_eq!(
            err.message,
            "Error: font name required\nUsage: theme font set <font>\nUse 'theme font list' to see available fonts"
        );
    }

    #[test]
    fn list_marks_the_current_choice() {
        let store = MemoryPrefsStore::default();
        FONT.reset(&store).expect("reset");
        let lines = FONT.list(&store);
        assert_eq!(lines[3], " [*]default        - Default Mono");
        assert_eq!(lines[5], "    dotgothic16    - Dot Gothic 16");
        assert!(lines.contains(&"Current font: default".to_string()));
    }

    #[test]
    fn current_settings_fall_back_for_unknown_values() {
        let store = MemoryPrefsStore::default();
        store
            .save_pref("terminal_color_scheme", "\"custom\"")
            .expect("save");
        let lines = current_settings(&store);
        assert!(lines.contains(&"Scheme: custom".to_string()));
        assert!(lines.contains(&"Name: Default".to_string()));
    }
}
