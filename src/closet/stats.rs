use std::collections::HashMap;

use chrono::{
    Datelike,
    Duration,
    NaiveDate,
};

use crate::core::{
    Category,
    Closet,
    Cloth,
};

/// Monday through Sunday of the week containing `today`, both ends inclusive.
pub fn week_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    (monday, monday + Duration::days(6))
}

fn worn_in_range(cloth: &Cloth, start: NaiveDate, end: NaiveDate) -> bool {
    cloth.count > 0 && matches!(cloth.last_wear_date, Some(d) if start <= d && d <= end)
}

/// Total wear counts per category for items last worn in `today`'s week.
pub fn wear_counts_by_category(closet: &Closet, today: NaiveDate) -> HashMap<Category, u32> {
    let (start, end) = week_range(today);
    let mut counts = HashMap::new();
    for (_, cloth) in closet.iter_cloths() {
        if worn_in_range(cloth, start, end) {
            *counts.entry(cloth.category).or_insert(0) += cloth.count;
        }
    }
    counts
}

/// Wear counts per item name for items last worn in `today`'s week. Names are
/// unique, so each entry is just that item's count.
pub fn wear_counts_by_name(closet: &Closet, today: NaiveDate) -> HashMap<String, u32> {
    let (start, end) = week_range(today);
    let mut counts = HashMap::new();
    for (_, cloth) in closet.iter_cloths() {
        if worn_in_range(cloth, start, end) {
            counts.insert(cloth.name.clone(), cloth.count);
        }
    }
    counts
}
