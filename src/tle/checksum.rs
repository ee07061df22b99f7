/// Columns covered by the checksum; column 69 holds the digit itself.
pub const CHECKSUM_SPAN: usize = 68;

/// Modulo-10 checksum of a TLE line.
///
/// Only the first 68 columns are summed, so both a bare 68-column body and a
/// complete 69-column line can be passed. Digits count their value, a minus
/// sign counts one, every other character counts zero.
pub fn checksum(line: &str) -> u8 {
    let sum: u32 = line
        .bytes()
        .take(CHECKSUM_SPAN)
        .map(|b| match b {
            b'0'..=b'9' => u32::from(b - b'0'),
            b'-' => 1,
            _ => 0,
        })
        .sum();
    (sum % 10) as u8
}
