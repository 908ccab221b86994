//! Terminal output: prefixed log lines, page progress bars, watch status.
//!
//! ```ignore
//! log!("audit"; "hotel `{}` has no reports", id);
//!
//! let progress = ProgressBars::new_filtered(&[("hotels", 12), ("posts", 4)]);
//! progress.inc(0);
//! ```

use crate::utils::date::clock;
use colored::{ColoredString, Colorize};
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{Write, stdout},
    sync::{
        Mutex, OnceLock,
        atomic::{AtomicUsize, Ordering},
    },
};

static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Rows currently reserved by progress bars below the log output.
static BAR_ROWS: AtomicUsize = AtomicUsize::new(0);

// ============================================================================
// Layout
// ============================================================================
//
// "[render] [████░░░░] 42/100"
//  prefix   bar        count

/// `[` + `]` + trailing space.
const PREFIX_OVERHEAD: usize = 3;
/// ` [` + `]` around the bar, plus the space before the count.
const BAR_OVERHEAD: usize = 4;
const MIN_BAR_WIDTH: usize = 10;
const MAX_BAR_WIDTH: usize = 40;

#[inline]
const fn prefix_len(module: &str) -> usize {
    module.len() + PREFIX_OVERHEAD
}

fn terminal_width() -> usize {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120)) as usize
}

/// Log a message with a colored module prefix.
///
/// ```ignore
/// log!("build"; "wrote {} pages", count);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Write one log line above any active progress bars.
///
/// Single-line messages are cut to the terminal width.
#[allow(clippy::cast_possible_truncation)]
pub fn log(module: &str, message: &str) {
    let prefix = colorize(module);
    let mut stdout = stdout().lock();

    let rows = BAR_ROWS.load(Ordering::SeqCst);
    if rows > 0 {
        execute!(stdout, cursor::MoveUp(rows as u16)).ok();
        execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
    } else {
        execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    }

    let message = if message.contains('\n') {
        message
    } else {
        truncate_str(message, terminal_width().saturating_sub(prefix_len(module)))
    };
    writeln!(stdout, "{prefix} {message}").ok();

    // Give the bars their rows back; they repaint on the next increment.
    for _ in 0..rows {
        writeln!(stdout).ok();
    }
    stdout.flush().ok();
}

fn colorize(module: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module {
        "serve" => prefix.bright_blue().bold(),
        "watch" => prefix.bright_green().bold(),
        "audit" | "warn" => prefix.bright_magenta().bold(),
        "error" => prefix.bright_red().bold(),
        "rss" | "sitemap" => prefix.bright_cyan().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Cut `s` to at most `max_len` bytes on a char boundary.
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ============================================================================
// Progress Bars
// ============================================================================

/// One progress bar per page kind, each on its own terminal row.
///
/// Increments may come from any rayon worker; repaints are serialized.
pub struct ProgressBars {
    bars: Vec<Bar>,
    paint: Mutex<()>,
}

struct Bar {
    module: &'static str,
    prefix: ColoredString,
    total: usize,
    done: AtomicUsize,
}

impl ProgressBars {
    pub fn new(modules: &[(&'static str, usize)]) -> Self {
        let mut stdout = stdout().lock();
        for _ in modules {
            writeln!(stdout).ok();
        }
        stdout.flush().ok();
        BAR_ROWS.store(modules.len(), Ordering::SeqCst);

        let bars = modules
            .iter()
            .map(|&(module, total)| Bar {
                module,
                prefix: colorize(module),
                total,
                done: AtomicUsize::new(0),
            })
            .collect();

        Self {
            bars,
            paint: Mutex::new(()),
        }
    }

    /// Bars for the non-empty modules, or `None` when there is at most one item.
    pub fn new_filtered(modules: &[(&'static str, usize)]) -> Option<Self> {
        let modules: Vec<_> = modules.iter().copied().filter(|&(_, n)| n > 0).collect();
        if modules.iter().map(|&(_, n)| n).sum::<usize>() <= 1 {
            return None;
        }
        Some(Self::new(&modules))
    }

    /// Advance the bar named `module`. Unknown names are ignored.
    pub fn inc(&self, module: &str) {
        if let Some((row, bar)) = self.bars.iter().enumerate().find(|(_, b)| b.module == module) {
            let done = bar.done.fetch_add(1, Ordering::Relaxed) + 1;
            self.paint(row, bar, done);
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn paint(&self, row: usize, bar: &Bar, done: usize) {
        let _guard = self.paint.lock().ok();

        let count = format!("{done}/{}", bar.total);
        let room = terminal_width()
            .saturating_sub(prefix_len(bar.module) + BAR_OVERHEAD + count.len());
        let width = room.clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH);
        let filled = (done * width).checked_div(bar.total).unwrap_or(0).min(width);
        let track = "█".repeat(filled) + &"░".repeat(width - filled);

        let up = (self.bars.len() - row) as u16;
        let mut stdout = stdout().lock();
        execute!(stdout, cursor::MoveUp(up), Clear(ClearType::CurrentLine)).ok();
        write!(stdout, "{} [{track}] {count}", bar.prefix).ok();
        execute!(stdout, cursor::MoveDown(up)).ok();
        write!(stdout, "\r").ok();
        stdout.flush().ok();
    }

    /// Erase the bar rows.
    #[allow(clippy::cast_possible_truncation)]
    pub fn finish(&self) {
        if BAR_ROWS.swap(0, Ordering::SeqCst) == 0 {
            return;
        }
        let _guard = self.paint.lock().ok();
        let rows = self.bars.len() as u16;
        let mut stdout = stdout().lock();
        execute!(stdout, cursor::MoveUp(rows), Clear(ClearType::FromCursorDown)).ok();
        stdout.flush().ok();
    }
}

impl Drop for ProgressBars {
    fn drop(&mut self) {
        self.finish();
    }
}

// ============================================================================
// Watch Status
// ============================================================================

/// Timestamped status block for watch mode; each message replaces the last.
pub struct WatchStatus {
    last_lines: usize,
}

impl WatchStatus {
    pub const fn new() -> Self {
        Self { last_lines: 0 }
    }

    pub fn success(&mut self, message: &str) {
        self.display(Some("✓".green()), message);
    }

    pub fn unchanged(&mut self, message: &str) {
        self.display(None, &message.dimmed().to_string());
    }

    pub fn error(&mut self, summary: &str, detail: &str) {
        let message = if detail.is_empty() {
            summary.to_owned()
        } else {
            format!("{summary}\n{detail}")
        };
        self.display(Some("✗".red()), &message);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn display(&mut self, symbol: Option<ColoredString>, message: &str) {
        let mut stdout = stdout().lock();
        if self.last_lines > 0 {
            execute!(
                stdout,
                cursor::MoveUp(self.last_lines as u16),
                Clear(ClearType::FromCursorDown)
            )
            .ok();
        }

        let stamp = format!("[{}]", clock()).dimmed();
        match symbol {
            Some(symbol) => writeln!(stdout, "{stamp} {symbol} {message}").ok(),
            None => writeln!(stdout, "{stamp} {message}").ok(),
        };
        stdout.flush().ok();

        self.last_lines = line_count(message);
    }
}

fn line_count(message: &str) -> usize {
    message.matches('\n').count() + 1
}
