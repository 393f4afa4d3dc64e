use crossterm::style::Stylize;
use std::io::IsTerminal;
use unicode_width::UnicodeWidthStr;

pub fn is_stdout_terminal() -> bool {
    std::io::stdout().is_terminal()
}

pub fn get_terminal_width() -> usize {
    static TERMINAL_WIDTH: std::sync::LazyLock<usize> = std::sync::LazyLock::new(|| {
        // 1. Check RESTITCH_COLUMNS
        if let Ok(w) = std::env::var("RESTITCH_COLUMNS").map(|s| s.parse().unwrap_or(0))
            && w > 0
        {
            return w;
        }

        // 2. Check COLUMNS
        if let Ok(w) = std::env::var("COLUMNS").map(|s| s.parse().unwrap_or(0))
            && w > 0
        {
            return w;
        }

        // 3. System TTY
        if is_stdout_terminal()
            && let Ok((w, _)) = crossterm::terminal::size()
        {
            return w as usize;
        }

        // 4. Default fallback
        80
    });

    *TERMINAL_WIDTH
}

/// Prints a unified diff, colouring markers only when stdout is a tty.
pub fn print_unified_diff(diff: &str) {
    let colour = is_stdout_terminal();
    for line in diff.lines() {
        if !colour {
            println!("{}", line);
        } else if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", line.bold());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }
}

pub fn draw_panel(title: &str, lines: &[String], width: usize) {
    let inner_width = width.saturating_sub(2);
    let title_fmt = if title.is_empty() {
        String::new()
    } else {
        format!(" {} ", title)
    };
    let title_width = title_fmt.width().min(inner_width);
    let padding = inner_width.saturating_sub(title_width);

    println!("┌{}{}┐", title_fmt, "─".repeat(padding));
    for line in lines {
        let line_width = line.width();
        let pad = inner_width.saturating_sub(line_width + 1);
        println!("│ {}{}│", line, " ".repeat(pad));
    }
    println!("└{}┘", "─".repeat(inner_width));
}
