const BYTE_UNITS: &[&str] = &["b", "kb", "mb", "gb", "tb", "pb", "eb"];
const UNIT: f64 = 1024.0;

pub fn bytes(num: u64) -> String {
    let mut value = num as f64;
    let mut idx = 0;

    while value >= UNIT && idx + 1 < BYTE_UNITS.len() {
        value /= UNIT;
        idx += 1;
    }

    if idx == 0 {
        format!("{}{}", num, BYTE_UNITS[0])
    } else {
        format!("{:.2}{}", value, BYTE_UNITS[idx])
    }
}
