/// Prize for each ladder position, strictly increasing.
pub const PRIZE_LADDER: [u32; 10] = [
    1_000, 2_000, 5_000, 10_000, 20_000, 50_000, 100_000, 200_000, 500_000, 1_000_000,
];

/// Prize at stake for `position`; positions past the ladder clamp to the top prize.
pub fn prize_at(position: usize) -> u32 {
    PRIZE_LADDER[position.min(PRIZE_LADDER.len() - 1)]
}

/// What the player walks away with after failing at `position`.
pub fn guaranteed_prize(position: usize) -> u32 {
    match position {
        0 => 0,
        p => prize_at(p - 1),
    }
}

pub fn top_prize() -> u32 {
    PRIZE_LADDER[PRIZE_LADDER.len() - 1]
}

/// Formats a prize the Brazilian way, e.g. `R$ 1.000.000`.
pub fn format_prize(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("R$ {}", grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_is_strictly_increasing() {
        assert!(PRIZE_LADDER.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn guaranteed_prize_is_previous_rung() {
        assert_eq!(guaranteed_prize(0), 0);
        assert_eq!(guaranteed_prize(1), 1_000);
        assert_eq!(guaranteed_prize(2), 2_000);
        assert_eq!(guaranteed_prize(9), 500_000);
    }

    #[test]
    fn top_prize_is_last_rung() {
        assert_eq!(top_prize(), 1_000_000);
        assert_eq!(prize_at(42), top_prize());
    }

    #[test]
    fn formats_with_thousands_separators() {
        assert_eq!(format_prize(0), "R$ 0");
        assert_eq!(format_prize(999), "R$ 999");
        assert_eq!(format_prize(5_000), "R$ 5.000");
        assert_eq!(format_prize(1_000_000), "R$ 1.000.000");
    }
}
