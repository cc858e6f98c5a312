const UNIT: u64 = 1024;
const UNIT_PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// 格式化字节数为可读格式，如 "512 B"、"1.50 KB"、"2.00 GB"
pub fn format_size(bytes: u64) -> String {
    if bytes < UNIT {
        return format!("{} B", bytes);
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    format!("{:.2} {}B", bytes as f64 / div as f64, UNIT_PREFIXES[exp])
}
