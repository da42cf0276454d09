// Copyright © 2018 Cormac O'Brien
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of this software
// and associated documentation files (the "Software"), to deal in the Software without
// restriction, including without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all copies or
// substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
// BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::fmt::Write;

const SIGNIFICANT_DIGITS: i32 = 6;

/// Formats a float the way C's `%g` conversion does at its default precision.
///
/// Numbers are rounded to six significant digits. Fixed notation is used when the decimal
/// exponent lies in `[-4, 6)`, scientific notation (`1.5e+07`) otherwise, and trailing zeros are
/// stripped in both forms. The sign of negative zero is kept.
pub fn fmt_g(val: f64) -> String {
    if val.is_nan() {
        return "nan".to_owned();
    }

    if val.is_infinite() {
        return if val < 0.0 { "-inf" } else { "inf" }.to_owned();
    }

    if val == 0.0 {
        return if val.is_sign_negative() { "-0" } else { "0" }.to_owned();
    }

    // round to the target precision first so that 999999.5 lands on the right exponent
    let sci = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, val);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        let mut out = strip_zeros(mantissa).to_owned();
        let sign = if exponent < 0 { '-' } else { '+' };
        let _ = write!(out, "e{}{:02}", sign, exponent.abs());
        out
    } else {
        let precision = (SIGNIFICANT_DIGITS - 1 - exponent) as usize;
        strip_zeros(&format!("{:.*}", precision, val)).to_owned()
    }
}

/// Formats three components as space-separated `%g` values.
pub fn fmt_g3(x: f64, y: f64, z: f64) -> String {
    format!("{} {} {}", fmt_g(x), fmt_g(y), fmt_g(z))
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
