use chrono::{Datelike, NaiveDate};

/// The remembrance poppy badge is shown throughout November.
pub fn show_remembrance_poppy(today: NaiveDate) -> bool {
    today.month() == 11
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn november_only() {
        let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).unwrap();
        assert!(show_remembrance_poppy(d(11, 1)));
        assert!(show_remembrance_poppy(d(11, 30)));
        assert!(!show_remembrance_poppy(d(10, 31)));
        assert!(!show_remembrance_poppy(d(12, 1)));
    }
}
