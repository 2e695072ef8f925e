//! Terminal plot of a magnitude response
//!
//! Log-frequency x axis, fixed dB y axis.

use bq_dsp::FrequencyResponse;

/// Plot layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotConfig {
    /// Plot area columns, excluding the axis labels
    pub width: usize,
    /// Plot area rows
    pub height: usize,
    pub y_min_db: f64,
    pub y_max_db: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 72,
            height: 21,
            y_min_db: -40.0,
            y_max_db: 40.0,
        }
    }
}

impl PlotConfig {
    /// Row index for a dB value; 0 is the top row. Values outside the
    /// range are pinned to the nearest edge.
    fn row(&self, db: f64) -> usize {
        let span = self.y_max_db - self.y_min_db;
        let t = ((self.y_max_db - db) / span).clamp(0.0, 1.0);
        (t * (self.height - 1) as f64).round() as usize
    }
}

/// Render `response` as text
pub fn render(response: &FrequencyResponse, title: &str, config: &PlotConfig) -> String {
    let width = config.width.max(2);
    let height = config.height.max(2);
    let config = PlotConfig {
        width,
        height,
        ..*config
    };

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');

    let (Some(&f_min), Some(&f_max)) = (
        response.frequencies_hz.first(),
        response.frequencies_hz.last(),
    ) else {
        out.push_str("(no data)\n");
        return out;
    };

    let mut grid = vec![vec![' '; width]; height];

    let zero_row = config.row(0.0);
    for cell in grid[zero_row].iter_mut() {
        *cell = '-';
    }

    // Average the samples that fall into each column
    let log_min = f_min.ln();
    let log_span = (f_max.ln() - log_min).max(f64::EPSILON);
    let mut sums = vec![(0.0_f64, 0_usize); width];
    for (freq, db) in response.iter() {
        let t = ((freq.ln() - log_min) / log_span).clamp(0.0, 1.0);
        let col = (t * (width - 1) as f64).round() as usize;
        sums[col].0 += db;
        sums[col].1 += 1;
    }

    for (col, &(sum, count)) in sums.iter().enumerate() {
        if count > 0 {
            let row = config.row(sum / count as f64);
            grid[row][col] = '*';
        }
    }

    for (i, row) in grid.iter().enumerate() {
        let label = if i == 0 {
            format!("{:>+5.0}", config.y_max_db)
        } else if i == height - 1 {
            format!("{:>+5.0}", config.y_min_db)
        } else if i == zero_row {
            format!("{:>5}", "0")
        } else {
            " ".repeat(5)
        };
        out.push_str(&label);
        out.push_str(" |");
        out.extend(row.iter());
        out.push('\n');
    }

    out.push_str(&" ".repeat(6));
    out.push('+');
    out.push_str(&"-".repeat(width));
    out.push('\n');

    let left = format_hz(f_min);
    let right = format_hz(f_max);
    let gap = (width + 1).saturating_sub(left.len() + right.len());
    out.push_str(&" ".repeat(7));
    out.push_str(&left);
    out.push_str(&" ".repeat(gap));
    out.push_str(&right);
    out.push('\n');

    out
}

/// "20 Hz", "1.5 kHz"
pub fn format_hz(freq: f64) -> String {
    if freq >= 1000.0 {
        format!("{} kHz", trim_float(freq / 1000.0))
    } else {
        format!("{} Hz", trim_float(freq))
    }
}

fn trim_float(value: f64) -> String {
    let s = format!("{value:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bq_dsp::{NormalizedBiquadCoeffs, evaluate};

    #[test]
    fn test_flat_response_sits_on_zero_line() {
        let response = evaluate(&NormalizedBiquadCoeffs::bypass(), 48000.0, 500, 20.0, 24000.0);
        let config = PlotConfig::default();
        let text = render(&response, "flat", &config);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "flat");
        // title + rows + axis + labels
        assert_eq!(lines.len(), 1 + config.height + 2);

        let zero_line = lines[1 + config.row(0.0)];
        assert!(zero_line.starts_with("    0 |"));
        assert_eq!(zero_line.matches('*').count(), config.width);
    }

    #[test]
    fn test_row_mapping() {
        let config = PlotConfig::default();
        assert_eq!(config.row(40.0), 0);
        assert_eq!(config.row(-40.0), config.height - 1);
        assert_eq!(config.row(0.0), config.height / 2);
        assert_eq!(config.row(100.0), 0);
        assert_eq!(config.row(-300.0), config.height - 1);
    }

    #[test]
    fn test_empty_response() {
        let text = render(&FrequencyResponse::default(), "empty", &PlotConfig::default());
        assert_eq!(text, "empty\n(no data)\n");
    }

    #[test]
    fn test_format_hz() {
        assert_eq!(format_hz(20.0), "20 Hz");
        assert_eq!(format_hz(24000.0), "24 kHz");
        assert_eq!(format_hz(1500.0), "1.5 kHz");
        assert_eq!(format_hz(22050.0), "22.05 kHz");
    }
}
