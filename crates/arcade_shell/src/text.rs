//! Plain-text formatting helpers shared by commands.

const MS_PER_MINUTE: u64 = 60 * 1_000;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Right-pads `text` with spaces to at least `width` characters.
pub fn pad_right(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}

/// Horizontal rule of `width` copies of `ch`.
pub fn rule(ch: char, width: usize) -> String {
    std::iter::repeat(ch).take(width).collect()
}

/// `"game"` / `"games"` style pluralization.
pub fn plural(count: usize, singular: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {singular}s")
    }
}

/// Renders seconds as `"<h>h <m>m"`.
pub fn hours_minutes(seconds: u64) -> String {
    format!("{}h {}m", seconds / 3_600, (seconds % 3_600) / 60)
}

/// Coarse age of `then_ms` relative to `now_ms`: whole days, else hours, else minutes.
pub fn age(now_ms: u64, then_ms: u64) -> String {
    let diff = now_ms.saturating_sub(then_ms);
    let days = diff / MS_PER_DAY;
    if days > 0 {
        return format!("{days} days ago");
    }
    let hours = diff / MS_PER_HOUR;
    if hours > 0 {
        return format!("{hours} hours ago");
    }
    format!("{} minutes ago", diff / MS_PER_MINUTE)
}

/// Two-unit age used by `stats`, e.g. `"3 days and 1 hour"`.
pub fn detailed_age(now_ms: u64, then_ms: u64) -> String {
    let diff = now_ms.saturating_sub(then_ms);
    let days = diff / MS_PER_DAY;
    let hours = (diff % MS_PER_DAY) / MS_PER_HOUR;
    let minutes = (diff % MS_PER_HOUR) / MS_PER_MINUTE;
    let unit = |count: u64, name: &str| {
        if count == 1 {
            format!("{count} {name}")
        } else {
            format!("{count} {name}s")
        }
    };
    if days > 0 {
        format!("{} and {}", unit(days, "day"), unit(hours, "hour"))
    } else if hours > 0 {
        format!("{} and {}", unit(hours, "hour"), unit(minutes, "minute"))
    } else {
        unit(minutes, "minute")
    }
}

/// Greedy word wrap; words longer than `width` are split into `width`-sized chunks.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let chars = word.chars().collect::<Vec<_>>();
            lines.extend(chars.chunks(width).map(|chunk| chunk.iter().collect::<String>()));
            continue;
        }
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word_len > width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
