use byte_unit::{Byte, Unit};

/// Binary tiers, largest first. GB is the ceiling.
const TIERS: [(Unit, u64, &str); 3] = [
    (Unit::GiB, 1 << 30, "GB"),
    (Unit::MiB, 1 << 20, "MB"),
    (Unit::KiB, 1 << 10, "KB"),
];

/// Human readable size: plain bytes below 1024, otherwise two decimals in the
/// largest of KB/MB/GB (powers of 1024) that fits.
pub fn format_size(bytes: u64) -> String {
    for (unit, threshold, label) in TIERS {
        if bytes >= threshold {
            let value = Byte::from_u64(bytes).get_adjusted_unit(unit).get_value();
            return format!("{value:.2} {label}");
        }
    }

    format!("{bytes} B")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        // Arrange
        let inputs = [
            0,
            999,
            1023,
            1024,
            1536,
            1024 * 1024,
            5 * 1024 * 1024 + 512 * 1024,
            1073741824,
            3 * 1073741824 / 2,
            5000 * 1073741824,
        ];

        let outputs = [
            "0 B",
            "999 B",
            "1023 B",
            "1.00 KB",
            "1.50 KB",
            "1.00 MB",
            "5.50 MB",
            "1.00 GB",
            "1.50 GB",
            "5000.00 GB",
        ];

        for (input, output) in inputs.iter().zip(outputs.iter()) {
            let result = format_size(*input);

            // Assert
            assert_eq!(result, *output);
        }
    }
}
