//! Flag validation against recognized options, and the typed per-command option structs.

use arcade_shell_contract::{CommandDescriptor, ShellError};
use shell_lexer::RawFlag;

/// One validated flag, keyed by its canonical long name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    /// Canonical long name.
    pub name: String,
    /// Value for valued options.
    pub value: Option<String>,
}

/// Flags of one invocation, validated against the command's recognized options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    flags: Vec<Flag>,
}

impl FlagSet {
    /// Validates raw flags against `descriptor`, mapping short letters to long names.
    ///
    /// # Errors
    ///
    /// Returns a usage error for unknown options, values on presence-only options, and valued
    /// options given without a value.
    pub fn parse(raw: &[RawFlag], descriptor: &CommandDescriptor) -> Result<Self, ShellError> {
        let command = descriptor.name.as_str();
        let mut flags = Vec::with_capacity(raw.len());
        for flag in raw {
            let (spec, value) = match flag {
                RawFlag::Long { name } => (descriptor.option(name), None),
                RawFlag::LongValued { name, value } => (descriptor.option(name), Some(value)),
                RawFlag::Short { letter } => (descriptor.short_option(*letter), None),
            };
            let Some(spec) = spec else {
                return Err(ShellError::usage(format!(
                    "{command}: unrecognized option '{}'\nUsage: {}",
                    flag.display(),
                    descriptor.help.usage
                )));
            };
            match (spec.takes_value, value) {
                (true, None) => {
                    return Err(ShellError::usage(format!(
                        "{command}: option '--{}' requires a value (--{}=<value>)",
                        spec.name, spec.name
                    )))
                }
                (false, Some(_)) => {
                    return Err(ShellError::usage(format!(
                        "{command}: option '--{}' does not take a value",
                        spec.name
                    )))
                }
                _ => flags.push(Flag {
                    name: spec.name.clone(),
                    value: value.cloned(),
                }),
            }
        }
        Ok(Self { flags })
    }

    /// Builds a set directly; used when one command delegates to another.
    pub fn from_flags(flags: Vec<Flag>) -> Self {
        Self { flags }
    }

    /// Returns whether the option was given at least once.
    pub fn has(&self, name: &str) -> bool {
        self.flags.iter().any(|flag| flag.name == name)
    }

    /// Returns the value of the last occurrence of a valued option.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.flags
            .iter()
            .rev()
            .find(|flag| flag.name == name)
            .and_then(|flag| flag.value.as_deref())
    }

    /// Iterates flags in command-line order.
    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.iter()
    }
}

/// Parses a strictly positive count for `--<name>`.
///
/// # Errors
///
/// Returns a usage error for non-numeric or zero values.
pub fn positive_count(name: &str, raw: &str) -> Result<usize, ShellError> {
    match raw.parse::<usize>() {
        Ok(count) if count > 0 && raw.bytes().all(|byte| byte.is_ascii_digit()) => Ok(count),
        _ => Err(ShellError::usage(format!(
            "Invalid value for --{name}: '{raw}' (expected a positive integer)"
        ))),
    }
}

/// Which slice of a listing to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Window {
    /// Everything.
    #[default]
    All,
    /// The first N entries.
    Head(usize),
    /// The last N entries.
    Tail(usize),
}

/// Options accepted by `ls`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Windowing; when several of `--limit`, `--head`, `--tail` are given the last one wins.
    pub window: Window,
    /// Four-column layout.
    pub wide: bool,
}

impl ListOptions {
    /// Reads `--limit`, `--head`, `--tail`, and `--wide`.
    ///
    /// # Errors
    ///
    /// Returns a usage error for non-positive window sizes.
    pub fn from_flags(flags: &FlagSet) -> Result<Self, ShellError> {
        let mut options = Self {
            wide: flags.has("wide"),
            ..Self::default()
        };
        for flag in flags.iter() {
            let Some(raw) = flag.value.as_deref() else {
                continue;
            };
            options.window = match flag.name.as_str() {
                "limit" | "head" => Window::Head(positive_count(&flag.name, raw)?),
                "tail" => Window::Tail(positive_count(&flag.name, raw)?),
                _ => continue,
            };
        }
        Ok(options)
    }
}

/// Field searched by `search`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchField {
    /// Game title.
    #[default]
    Title,
    /// Developer credit.
    Developer,
    /// Genre.
    Genre,
    /// Release year.
    Year,
    /// Title, developer, genre, and year joined by spaces.
    All,
}

/// Options accepted by `search`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Searched field.
    pub field: SearchField,
    /// Maximum results shown.
    pub limit: Option<usize>,
    /// Sort by relevance score.
    pub precise: bool,
}

impl SearchOptions {
    /// Reads `--field`, `--limit`, and `--precise`.
    ///
    /// # Errors
    ///
    /// Returns a usage error for unknown fields or a non-positive limit.
    pub fn from_flags(flags: &FlagSet) -> Result<Self, ShellError> {
        let field = match flags.value("field").map(str::to_lowercase).as_deref() {
            None | Some("title") => SearchField::Title,
            Some("developer") => SearchField::Developer,
            Some("genre") => SearchField::Genre,
            Some("year") => SearchField::Year,
            Some("all") => SearchField::All,
            Some(other) => {
                return Err(ShellError::usage(format!(
                    "Invalid field: {other}. Use: title, developer, genre, year, or all"
                )))
            }
        };
        let limit = flags
            .value("limit")
            .map(|raw| positive_count("limit", raw))
            .transpose()?;
        Ok(Self {
            field,
            limit,
            precise: flags.has("precise"),
        })
    }
}

/// Options accepted by `history`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryOptions {
    /// Entries to show; `None` uses the configured default.
    pub limit: Option<usize>,
    /// Show every entry.
    pub all: bool,
    /// Clear the persisted history instead of showing it.
    pub clear: bool,
}

impl HistoryOptions {
    /// Reads the optional positional count plus `--limit`, `--all`, and `--clear`.
    ///
    /// `--limit` overrides the positional count.
    ///
    /// # Errors
    ///
    /// Returns a usage error for invalid counts.
    pub fn from_invocation(args: &[String], flags: &FlagSet) -> Result<Self, ShellError> {
        let mut limit = None;
        if let Some(raw) = args.first() {
            limit = Some(
                raw.parse::<usize>()
                    .ok()
                    .filter(|count| *count > 0)
                    .ok_or_else(|| ShellError::usage(format!("Invalid number: {raw}")))?,
            );
        }
        if let Some(raw) = flags.value("limit") {
            limit = Some(
                raw.parse::<usize>()
                    .ok()
                    .filter(|count| *count > 0)
                    .ok_or_else(|| ShellError::usage(format!("Invalid limit value: {raw}")))?,
            );
        }
        Ok(Self {
            limit,
            all: flags.has("all"),
            clear: flags.has("clear"),
        })
    }
}

/// A user-supplied game reference from the positional identifier and selector flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSelector {
    /// Positional identifier: `@collection:index`, a bare index, or a title.
    pub identifier: Option<String>,
    /// `--collection=<token>`
    pub collection: Option<String>,
    /// `--index=<n>`
    pub index: Option<String>,
}

impl GameSelector {
    /// Reads the identifier at `position` plus `--collection` and `--index`.
    pub fn from_invocation(args: &[String], position: usize, flags: &FlagSet) -> Self {
        Self {
            identifier: args.get(position).cloned(),
            collection: flags.value("collection").map(str::to_string),
            index: flags.value("index").map(str::to_string),
        }
    }

    /// Selector holding only a positional identifier.
    pub fn identifier(raw: impl Into<String>) -> Self {
        Self {
            identifier: Some(raw.into()),
            ..Self::default()
        }
    }
}
