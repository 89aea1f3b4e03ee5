//! Log-space target encoding and the guarded inverse used when serving.

/// Training target for a price: `ln(1 + price)`.
pub fn encode_price(price: f64) -> f64 {
    price.ln_1p()
}

/// Invert `encode_price`, clamp anything below zero or non-finite to zero, round to cents.
pub fn decode_price(log_price: f64) -> f64 {
    let price = log_price.exp_m1();
    if !price.is_finite() || price < 0.0 {
        return 0.0;
    }
    round_cents(price)
}

/// Round to two decimals, halves away from zero. Values too large to scale are returned as is.
pub fn round_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}
