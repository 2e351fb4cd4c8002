use std::io::IsTerminal;

/// Minimum column width before truncation kicks in.
const MIN_WIDTH: usize = 4;

#[derive(Clone, Copy, Debug, Default)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

impl TableOptions {
    /// Width from `COLUMNS`; color only on a terminal without `NO_COLOR`.
    #[must_use]
    pub fn detect() -> Self {
        let max_width = std::env::var("COLUMNS")
            .ok()
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|width| *width > 0);
        let color = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self { max_width, color }
    }
}

/// A header row plus string cells, rendered with two-space column gaps.
#[derive(Clone, Debug)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn render(&self, options: TableOptions) -> String {
        let mut widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(index))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
                    .max(header.chars().count())
            })
            .collect();
        self.fit(&mut widths, options.max_width);

        let header_line = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(header, width)| pad(&truncate(header, *width), *width, false))
            .collect::<Vec<_>>()
            .join("  ");
        let divider = "-".repeat(header_line.chars().count());

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(header_line.trim_end().to_string());
        lines.push(divider.trim_end().to_string());
        for row in &self.rows {
            let line = widths
                .iter()
                .enumerate()
                .map(|(index, width)| {
                    let cell = truncate(row.get(index).map_or("-", String::as_str), *width);
                    let padded = pad(&cell, *width, is_numeric(&cell));
                    if options.color {
                        colorize(&cell, padded)
                    } else {
                        padded
                    }
                })
                .collect::<Vec<_>>()
                .join("  ");
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }

    /// Shrink the widest columns one character at a time until the table fits.
    fn fit(&self, widths: &mut [usize], max_width: Option<usize>) {
        let Some(max_width) = max_width else {
            return;
        };
        let gaps = widths.len().saturating_sub(1) * 2;

        while widths.iter().sum::<usize>() + gaps > max_width {
            let widest = widths
                .iter()
                .enumerate()
                .filter(|(index, width)| {
                    **width > self.headers[*index].chars().count().max(MIN_WIDTH)
                })
                .max_by_key(|(_, width)| **width)
                .map(|(index, _)| index);
            let Some(index) = widest else {
                break;
            };
            widths[index] -= 1;
        }
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(value.chars().count()));
    if right_align {
        format!("{fill}{value}")
    } else {
        format!("{value}{fill}")
    }
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_digit())
}

fn colorize(cell: &str, padded: String) -> String {
    let code = match cell {
        "ok" | "live" => "32",
        "dry_run" | "skipped" => "33",
        "failed" | "aborted" => "31",
        _ => return padded,
    };
    padded.replacen(cell, &format!("\u{1b}[{code}m{cell}\u{1b}[0m"), 1)
}
