use chrono::{DateTime, Local, Utc};

/// 格式化时间为本地时区的友好显示格式
pub fn format_time(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// 格式化相对时间 (例如: "2 天前")
pub fn format_relative_time(time: DateTime<Utc>) -> String {
    format_relative_time_from(time, Utc::now())
}

fn format_relative_time_from(time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(time).num_seconds();

    // 时间在未来（时钟偏差等），直接显示绝对时间
    if seconds < 0 {
        return format_time(time);
    }

    match seconds {
        0..=59 => "刚刚".to_string(),
        60..=3599 => format!("{} 分钟前", seconds / 60),
        3600..=86399 => format!("{} 小时前", seconds / 3600),
        86400..=2591999 => format!("{} 天前", seconds / 86400),
        2592000..=31535999 => format!("{} 个月前", seconds / 2592000),
        _ => format!("{} 年前", seconds / 31536000),
    }
}
