use chrono::NaiveDate;

/// Today as a calendar date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
