use crate::system::Percent;

/// Glyphs for the trend line, lowest to highest.
const TREND_GLYPHS: &[u8] = b"_.-:=+*#";

/// Linear meter: `level` percent of `width` cells filled.
pub fn meter_bar(level: Percent, width: usize) -> String {
    let filled = (usize::from(level.get()) * width) / 100;
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    bar.extend(std::iter::repeat_n('#', filled));
    bar.extend(std::iter::repeat_n('.', width - filled));
    bar.push(']');
    bar
}

/// One glyph per sample, each scaled against `scale`.
pub fn trend_line(samples: &[f64], scale: f64) -> String {
    let top = TREND_GLYPHS.len() - 1;
    let scale = if scale > 0.0 { scale } else { 1.0 };
    samples
        .iter()
        .map(|&s| {
            let step = ((s / scale).clamp(0.0, 1.0) * top as f64).round() as usize;
            char::from(TREND_GLYPHS[step.min(top)])
        })
        .collect()
}

pub fn format_load(value: f64) -> String {
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_bar_edges() {
        assert_eq!(meter_bar(Percent::ZERO, 4), "[....]");
        assert_eq!(meter_bar(Percent::FULL, 4), "[####]");
        assert_eq!(meter_bar(Percent::new(50), 10), "[#####.....]");
        assert_eq!(meter_bar(Percent::new(99), 10), "[#########.]");
    }

    #[test]
    fn trend_line_scales_to_peak() {
        assert_eq!(trend_line(&[0.0, 2.0, 4.0], 4.0), "_=#");
        assert_eq!(trend_line(&[], 1.0), "");
        // values above the scale saturate
        assert_eq!(trend_line(&[9.0], 1.0), "#");
    }

    #[test]
    fn load_has_two_decimals() {
        assert_eq!(format_load(0.5), "0.50");
    }
}
