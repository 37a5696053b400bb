//! Sentiment scoring: a raw 0-100 value mapped to seven fixed bands.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentBand {
    Capitulation,
    Fear,
    Anxious,
    Neutral,
    Greed,
    Euphoria,
    Mania,
}

impl SentimentBand {
    pub fn icon(&self) -> &'static str {
        match self {
            SentimentBand::Capitulation => "🥶",
            SentimentBand::Fear => "😨",
            SentimentBand::Anxious => "😟",
            SentimentBand::Neutral => "😐",
            SentimentBand::Greed => "🤑",
            SentimentBand::Euphoria => "🤩",
            SentimentBand::Mania => "🚀",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SentimentBand::Capitulation => "capitulation, sellers exhausted",
            SentimentBand::Fear => "widespread fear, value hunters stirring",
            SentimentBand::Anxious => "anxious drift, conviction is thin",
            SentimentBand::Neutral => "neutral, no crowd to lean against",
            SentimentBand::Greed => "greed building, chasing gets expensive",
            SentimentBand::Euphoria => "euphoria, late money arriving",
            SentimentBand::Mania => "mania, exits get crowded from here",
        }
    }
}

impl fmt::Display for SentimentBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SentimentBand::Capitulation => "Capitulation",
            SentimentBand::Fear => "Fear",
            SentimentBand::Anxious => "Anxious",
            SentimentBand::Neutral => "Neutral",
            SentimentBand::Greed => "Greed",
            SentimentBand::Euphoria => "Euphoria",
            SentimentBand::Mania => "Mania",
        };
        write!(f, "{name}")
    }
}

/// Where the raw score came from, kept for the rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentSource {
    /// External fear/greed index (crypto).
    ExternalIndex,
    /// The instrument's own RSI.
    Rsi,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScore {
    pub raw: u8,
    pub band: SentimentBand,
    pub source: SentimentSource,
}

impl SentimentScore {
    /// Pure band lookup; inputs above 100 clamp to 100.
    pub fn from_raw(raw: u8, source: SentimentSource) -> Self {
        let raw = raw.min(100);
        let band = match raw {
            0..=10 => SentimentBand::Capitulation,
            11..=25 => SentimentBand::Fear,
            26..=40 => SentimentBand::Anxious,
            41..=59 => SentimentBand::Neutral,
            60..=74 => SentimentBand::Greed,
            75..=89 => SentimentBand::Euphoria,
            _ => SentimentBand::Mania,
        };
        Self { raw, band, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_total_over_0_to_100() {
        // Every integer maps to exactly one band, and band edges land
        // where documented.
        for raw in 0..=100u8 {
            let score = SentimentScore::from_raw(raw, SentimentSource::Rsi);
            let expected = match raw {
                0..=10 => SentimentBand::Capitulation,
                11..=25 => SentimentBand::Fear,
                26..=40 => SentimentBand::Anxious,
                41..=59 => SentimentBand::Neutral,
                60..=74 => SentimentBand::Greed,
                75..=89 => SentimentBand::Euphoria,
                _ => SentimentBand::Mania,
            };
            assert_eq!(score.band, expected, "raw {raw}");
        }
    }

    #[test]
    fn boundary_values() {
        let band = |raw| SentimentScore::from_raw(raw, SentimentSource::Rsi).band;
        assert_eq!(band(10), SentimentBand::Capitulation);
        assert_eq!(band(11), SentimentBand::Fear);
        assert_eq!(band(25), SentimentBand::Fear);
        assert_eq!(band(26), SentimentBand::Anxious);
        assert_eq!(band(59), SentimentBand::Neutral);
        assert_eq!(band(60), SentimentBand::Greed);
        assert_eq!(band(89), SentimentBand::Euphoria);
        assert_eq!(band(90), SentimentBand::Mania);
    }

    #[test]
    fn over_100_clamps() {
        let score = SentimentScore::from_raw(250, SentimentSource::ExternalIndex);
        assert_eq!(score.raw, 100);
        assert_eq!(score.band, SentimentBand::Mania);
    }
}
