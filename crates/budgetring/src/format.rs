use ringchart::ValueFormatter;
use serde::Deserialize;

/// Currency rendering for labels and the center readout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub decimals: usize,
    pub grouping: bool,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            decimals: 2,
            grouping: true,
        }
    }
}

impl CurrencyFormat {
    pub fn format(&self, value: f64) -> String {
        let fixed = format!("{:.*}", self.decimals, value.abs());
        let (whole, fraction) = match fixed.split_once('.') {
            Some((w, f)) => (w, Some(f)),
            None => (fixed.as_str(), None),
        };

        let whole = if self.grouping {
            group_thousands(whole)
        } else {
            whole.to_string()
        };
        let sign = if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
            "-"
        } else {
            ""
        };

        match fraction {
            Some(f) => format!("{sign}{}{whole}.{f}", self.symbol),
            None => format!("{sign}{}{whole}", self.symbol),
        }
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    digits
        .chars()
        .enumerate()
        .fold(String::with_capacity(len + len / 3), |mut out, (i, c)| {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
            out
        })
}

impl ValueFormatter for CurrencyFormat {
    fn format_value(&self, value: f64) -> String {
        self.format(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format() {
        let fmt = CurrencyFormat::default();

        assert_eq!(fmt.format(0.0), "$0.00");
        assert_eq!(fmt.format(40.0), "$40.00");
        assert_eq!(fmt.format(1450.5), "$1,450.50");
        assert_eq!(fmt.format(1234567.891), "$1,234,567.89");
        assert_eq!(fmt.format(999.999), "$1,000.00");
    }

    #[test]
    fn test_custom_format() {
        let fmt = CurrencyFormat {
            symbol: "€".to_string(),
            decimals: 0,
            grouping: false,
        };

        assert_eq!(fmt.format(12345.4), "€12345");
        assert_eq!(fmt.format_value(7.0), "€7");
    }

    #[test]
    fn test_negative_values_keep_sign() {
        let fmt = CurrencyFormat::default();

        assert_eq!(fmt.format(-1500.0), "-$1,500.00");
        assert_eq!(fmt.format(-0.001), "$0.00");
    }

    #[test]
    fn test_partial_deserialization() {
        let fmt: CurrencyFormat = serde_json::from_str(r#"{ "symbol": "£" }"#).unwrap();

        assert_eq!(fmt.symbol, "£");
        assert_eq!(fmt.decimals, 2);
        assert!(fmt.grouping);
    }
}
