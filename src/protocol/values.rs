// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Numeric coercion, normalization and scaling rules shared by the encoder,
//! the decoder and the endpoints.

use serde_json::Value;

/// Highest PWM step accepted by the `aout` command.
pub const PWM_MAX_STEPS: u32 = 1439;
/// ADC reading at zero current (12-bit converter, centered).
pub const ADC_MIDSCALE_COUNTS: f64 = 2048.0;
/// ADC reference voltage.
pub const ADC_REFERENCE_VOLTS: f64 = 3.3;
/// Current sense scale in volts per amp.
pub const SENSE_VOLTS_PER_AMP: f64 = 0.11;

/// Post-decode transform applied to every sample of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    PassThrough,
    DiagnosticScale,
}

impl Transform {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Transform::PassThrough => value,
            Transform::DiagnosticScale => diagnostic_scale(value),
        }
    }
}

/// Convert raw ADC counts to sensed amps.
pub fn diagnostic_scale(counts: f64) -> f64 {
    let volts = ADC_REFERENCE_VOLTS * (counts - ADC_MIDSCALE_COUNTS) / ADC_MIDSCALE_COUNTS;
    volts / SENSE_VOLTS_PER_AMP
}

/// Parse a trimmed numeric token: decimal (with optional exponent) or
/// `0x`-prefixed hex. Empty and non-finite tokens are rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok()? as f64,
        None => trimmed.parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

/// Coerce a bus payload to a number: numbers pass, booleans map to 1/0,
/// null maps to 0, strings go through [`parse_number`].
pub fn coerce_number(payload: &Value) -> Option<f64> {
    match payload {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::String(s) => parse_number(s),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Normalize a payload to an output level in `[0, 1]`.
///
/// The literal strings `"true"` and `"false"` map to 1 and 0; anything else
/// is coerced to a number and clamped. Payloads that are not numeric yield
/// `None`.
pub fn normalize_bool(payload: &Value) -> Option<f64> {
    let value = match payload {
        Value::String(s) if s == "true" => 1.0,
        Value::String(s) if s == "false" => 0.0,
        other => coerce_number(other)?,
    };
    Some(value.clamp(0.0, 1.0))
}

/// Scale a `[0, 1]` level to PWM steps, rounding halves up.
pub fn pwm_steps(level: f64) -> u32 {
    let steps = (level * PWM_MAX_STEPS as f64 + 0.5).floor();
    steps.clamp(0.0, PWM_MAX_STEPS as f64) as u32
}

/// Render a number the way it goes on the wire: integral values without a
/// fractional part, everything else in shortest round-trip form.
pub fn format_value(value: f64) -> String {
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_bool() {
        assert_eq!(normalize_bool(&json!("true")), Some(1.0));
        assert_eq!(normalize_bool(&json!("false")), Some(0.0));
        assert_eq!(normalize_bool(&json!(-5)), Some(0.0));
        assert_eq!(normalize_bool(&json!(5)), Some(1.0));
        assert_eq!(normalize_bool(&json!(0.5)), Some(0.5));
        assert_eq!(normalize_bool(&json!(true)), Some(1.0));
        assert_eq!(normalize_bool(&json!("0.25")), Some(0.25));
        assert_eq!(normalize_bool(&json!("TRUE")), None);
        assert_eq!(normalize_bool(&json!("on")), None);
        assert_eq!(normalize_bool(&json!([1])), None);
    }

    #[test]
    fn test_diagnostic_scale() {
        assert_eq!(diagnostic_scale(2048.0), 0.0);
        assert!((diagnostic_scale(4096.0) - 30.0).abs() < 1e-9);
        assert!((diagnostic_scale(0.0) + 30.0).abs() < 1e-9);
        assert_eq!(Transform::PassThrough.apply(4096.0), 4096.0);
    }

    #[test]
    fn test_pwm_steps() {
        assert_eq!(pwm_steps(1.0), 1439);
        assert_eq!(pwm_steps(0.0), 0);
        // 719.5 rounds half up
        assert_eq!(pwm_steps(0.5), 720);
        assert_eq!(pwm_steps(0.25), 360);
    }

    #[test]
    fn test_parse_number() {
        struct TestCase {
            input: &'static str,
            expected: Option<f64>,
        }

        let test_cases = vec![
            TestCase { input: "1", expected: Some(1.0) },
            TestCase { input: "  2048\r", expected: Some(2048.0) },
            TestCase { input: "-0.5", expected: Some(-0.5) },
            TestCase { input: "1e3", expected: Some(1000.0) },
            TestCase { input: "0x1F", expected: Some(31.0) },
            TestCase { input: "", expected: None },
            TestCase { input: "   ", expected: None },
            TestCase { input: "abc", expected: None },
            TestCase { input: "NaN", expected: None },
            TestCase { input: "inf", expected: None },
            TestCase { input: "1 2", expected: None },
        ];

        for case in test_cases {
            assert_eq!(parse_number(case.input), case.expected, "input {:?}", case.input);
        }
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(1.0), "1");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(0.5), "0.5");
        assert_eq!(format_value(-12.25), "-12.25");
    }
}
