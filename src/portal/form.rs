use crate::config::{AppConfig, MatcherConfig};

/// Raw form inputs, echoed back into the page on re-render.
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    pub base_url: String,
    pub limit: String,
    pub timeout: String,
    pub min_score: String,
}

impl FormValues {
    pub fn from_defaults(defaults: &AppConfig) -> Self {
        Self {
            base_url: defaults.base_url.clone(),
            limit: defaults.limit.to_string(),
            timeout: defaults.timeout_secs.to_string(),
            min_score: defaults.min_score.to_string(),
        }
    }

    /// Overwrites one field from a submitted value; blanks keep the default.
    pub fn set(&mut self, name: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        let slot = match name {
            "base_url" => &mut self.base_url,
            "limit" => &mut self.limit,
            "timeout" => &mut self.timeout,
            "min_score" => &mut self.min_score,
            _ => return,
        };
        *slot = value.to_string();
    }

    /// Validated settings, or the message to show above the form.
    pub fn parse(&self) -> Result<(MatcherConfig, f64), String> {
        let limit: i64 = self.limit.parse().map_err(|_| "Limit must be an integer.".to_string())?;
        if limit < 1 {
            return Err("Limit must be at least 1.".into());
        }

        let timeout = parse_number(&self.timeout, "Timeout")?;
        if timeout <= 0.0 {
            return Err("Timeout must be greater than 0.".into());
        }

        let min_score = parse_number(&self.min_score, "Min Score")?;
        if min_score < 0.0 {
            return Err("Min Score must be at least 0.".into());
        }
        if min_score > 1.0 {
            return Err("Min Score must be at most 1.".into());
        }

        Ok((
            MatcherConfig::new(self.base_url.clone(), limit as usize, timeout),
            min_score,
        ))
    }
}

fn parse_number(raw: &str, label: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("{label} must be a number.")),
    }
}
