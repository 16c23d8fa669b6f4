use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    /// The label written into the ledger's action column.
    pub fn label(&self, locale: LabelLocale) -> &'static str {
        match (self, locale) {
            (TradeAction::Buy, LabelLocale::English) => "Cash Buy",
            (TradeAction::Sell, LabelLocale::English) => "Cash Sell",
            (TradeAction::Buy, LabelLocale::TraditionalChinese) => "現股買進",
            (TradeAction::Sell, LabelLocale::TraditionalChinese) => "現股賣出",
        }
    }
}

/// A contiguous range of the sentiment index, ordered from most fearful to most greedy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SentimentBand {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
}

impl SentimentBand {
    pub fn label(&self, locale: LabelLocale) -> &'static str {
        match locale {
            LabelLocale::English => match self {
                SentimentBand::ExtremeFear => "Extreme Fear",
                SentimentBand::Fear => "Fear",
                SentimentBand::Neutral => "Neutral",
                SentimentBand::Greed => "Greed",
                SentimentBand::ExtremeGreed => "Extreme Greed",
            },
            LabelLocale::TraditionalChinese => match self {
                SentimentBand::ExtremeFear => "極度恐慌",
                SentimentBand::Fear => "恐慌",
                SentimentBand::Neutral => "中立",
                SentimentBand::Greed => "貪婪",
                SentimentBand::ExtremeGreed => "極度貪婪",
            },
        }
    }
}

/// Language used for ledger headers and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelLocale {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "zh-TW")]
    TraditionalChinese,
}
