//! Merging per-hall meal blocks into canonical menu and schedule records.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::model::{MealPeriod, MealScheduleRecord, MenuItemRecord, RawMealBlock};
use crate::time::{resolve_window, UtcOffset};

/// The two record sets produced by one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub menu_items: Vec<MenuItemRecord>,
    pub meal_schedules: Vec<MealScheduleRecord>,
}

impl Aggregation {
    /// Orders both collections by their identity keys.
    pub fn sorted(mut self) -> Self {
        self.menu_items
            .sort_by(|a, b| (&a.dining_hall_id, &a.name).cmp(&(&b.dining_hall_id, &b.name)));
        self.meal_schedules
            .sort_by(|a, b| (&a.dining_hall_id, a.meal_period).cmp(&(&b.dining_hall_id, b.meal_period)));
        self
    }
}

/// Accumulates blocks hall by hall.
///
/// Items are keyed by `(name, dining_hall_id)` so the result does not depend
/// on the order in which halls or blocks arrive. Schedules are keyed by
/// `(dining_hall_id, meal_period)`; the first resolvable window wins.
pub struct MenuAggregator {
    reference_date: NaiveDate,
    offset: UtcOffset,
    now: DateTime<Utc>,
    item_index: HashMap<(String, String), usize>,
    schedule_keys: HashSet<(String, MealPeriod)>,
    result: Aggregation,
}

impl MenuAggregator {
    pub fn new(reference_date: NaiveDate, offset: UtcOffset, now: DateTime<Utc>) -> Self {
        Self {
            reference_date,
            offset,
            now,
            item_index: HashMap::new(),
            schedule_keys: HashSet::new(),
            result: Aggregation::default(),
        }
    }

    pub fn add_hall(&mut self, dining_hall_id: &str, blocks: &[RawMealBlock]) {
        for block in blocks.iter().filter(|b| b.has_items()) {
            for name in &block.items {
                let key = (name.clone(), dining_hall_id.to_string());
                match self.item_index.get(&key) {
                    Some(&idx) => {
                        self.result.menu_items[idx].meal_periods.insert(block.meal_period);
                    }
                    None => {
                        self.item_index.insert(key, self.result.menu_items.len());
                        self.result.menu_items.push(MenuItemRecord::new(
                            name.as_str(),
                            dining_hall_id,
                            block.meal_period,
                            self.now,
                        ));
                    }
                }
            }

            let schedule_key = (dining_hall_id.to_string(), block.meal_period);
            if self.schedule_keys.contains(&schedule_key) {
                continue;
            }

            let window = block
                .time_window
                .as_deref()
                .and_then(|w| resolve_window(w, self.reference_date, self.offset));

            match window {
                Some((start_time, end_time)) => {
                    self.schedule_keys.insert(schedule_key);
                    self.result.meal_schedules.push(MealScheduleRecord {
                        dining_hall_id: dining_hall_id.to_string(),
                        meal_period: block.meal_period,
                        start_time,
                        end_time,
                        created_at: self.now,
                    });
                }
                None => {
                    debug!(
                        dining_hall = dining_hall_id,
                        meal_period = %block.meal_period,
                        window = block.time_window.as_deref().unwrap_or(""),
                        "No resolvable time window; schedule skipped"
                    );
                }
            }
        }
    }

    pub fn finish(self) -> Aggregation {
        self.result
    }
}

/// Aggregates every hall's blocks, visiting halls in id order.
pub fn aggregate(
    per_hall: &BTreeMap<String, Vec<RawMealBlock>>,
    reference_date: NaiveDate,
    offset: UtcOffset,
    now: DateTime<Utc>,
) -> Aggregation {
    let mut aggregator = MenuAggregator::new(reference_date, offset, now);
    for (dining_hall_id, blocks) in per_hall {
        aggregator.add_hall(dining_hall_id, blocks);
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MealPeriod;
    use std::collections::BTreeSet;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn block(period: MealPeriod, window: Option<&str>, items: &[&str]) -> RawMealBlock {
        RawMealBlock {
            meal_period: period,
            time_window: window.map(str::to_string),
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn run(per_hall: BTreeMap<String, Vec<RawMealBlock>>) -> Aggregation {
        aggregate(&per_hall, date(), UtcOffset::EASTERN_STANDARD, Utc::now())
    }

    #[test]
    fn test_item_in_two_periods_is_merged() {
        let per_hall = BTreeMap::from([(
            "1920-commons".to_string(),
            vec![
                block(MealPeriod::Lunch, None, &["Pizza"]),
                block(MealPeriod::Dinner, None, &["Pizza"]),
            ],
        )]);

        let result = run(per_hall);
        assert_eq!(result.menu_items.len(), 1);
        let pizza = &result.menu_items[0];
        assert_eq!(pizza.name, "Pizza");
        assert_eq!(pizza.dining_hall_id, "1920-commons");
        assert_eq!(
            pizza.meal_periods,
            BTreeSet::from([MealPeriod::Lunch, MealPeriod::Dinner])
        );
    }

    #[test]
    fn test_same_name_in_different_halls_stays_separate() {
        let per_hall = BTreeMap::from([
            ("a".to_string(), vec![block(MealPeriod::Lunch, None, &["Soup"])]),
            ("b".to_string(), vec![block(MealPeriod::Lunch, None, &["Soup"])]),
        ]);
        assert_eq!(run(per_hall).menu_items.len(), 2);
    }

    #[test]
    fn test_duplicate_item_in_one_block_is_single_record() {
        let per_hall = BTreeMap::from([(
            "a".to_string(),
            vec![block(MealPeriod::Lunch, None, &["Soup", "Soup"])],
        )]);
        let result = run(per_hall);
        assert_eq!(result.menu_items.len(), 1);
        assert_eq!(result.menu_items[0].meal_periods.len(), 1);
    }

    #[test]
    fn test_schedule_requires_items_and_both_times() {
        let per_hall = BTreeMap::from([(
            "a".to_string(),
            vec![
                block(MealPeriod::Breakfast, Some("7:00 am - 10:00 am"), &["Eggs"]),
                block(MealPeriod::Lunch, Some("lunch hours vary"), &["Soup"]),
                block(MealPeriod::Dinner, Some("5:00 pm - 8:00 pm"), &[]),
                block(MealPeriod::Brunch, None, &["Waffles"]),
            ],
        )]);

        let result = run(per_hall);
        assert_eq!(result.meal_schedules.len(), 1);
        let breakfast = &result.meal_schedules[0];
        assert_eq!(breakfast.meal_period, MealPeriod::Breakfast);
        assert_eq!(breakfast.start_time, "2024-03-01 07:00:00-05");
        assert_eq!(breakfast.end_time, "2024-03-01 10:00:00-05");

        // Items of the unparsable lunch window still count.
        let names: BTreeSet<&str> = result.menu_items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, BTreeSet::from(["Eggs", "Soup", "Waffles"]));
    }

    #[test]
    fn test_empty_blocks_produce_nothing() {
        let per_hall = BTreeMap::from([(
            "b".to_string(),
            vec![block(MealPeriod::Dinner, Some("5:00 pm - 8:00 pm"), &[])],
        )]);
        assert_eq!(run(per_hall), Aggregation::default());
    }

    #[test]
    fn test_every_item_has_a_meal_period() {
        let per_hall = BTreeMap::from([(
            "a".to_string(),
            vec![
                block(MealPeriod::Breakfast, None, &["Eggs", "Toast"]),
                block(MealPeriod::Lunch, None, &[]),
            ],
        )]);
        assert!(run(per_hall)
            .menu_items
            .iter()
            .all(|i| !i.meal_periods.is_empty()));
    }

    #[test]
    fn test_result_does_not_depend_on_block_order() {
        let forward = vec![
            block(MealPeriod::Breakfast, None, &["Eggs"]),
            block(MealPeriod::Lunch, None, &["Eggs", "Soup"]),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let now = Utc::now();
        let a = aggregate(
            &BTreeMap::from([("a".to_string(), forward)]),
            date(),
            UtcOffset::EASTERN_STANDARD,
            now,
        )
        .sorted();
        let b = aggregate(
            &BTreeMap::from([("a".to_string(), reversed)]),
            date(),
            UtcOffset::EASTERN_STANDARD,
            now,
        )
        .sorted();
        assert_eq!(a, b);
    }

    #[test]
    fn test_repeated_meal_period_yields_one_schedule() {
        let per_hall = BTreeMap::from([(
            "a".to_string(),
            vec![
                block(MealPeriod::Lunch, Some("hours vary"), &["Salad"]),
                block(MealPeriod::Lunch, Some("11:00 am - 2:00 pm"), &["Soup"]),
                block(MealPeriod::Lunch, Some("12:00 pm - 3:00 pm"), &["Wrap"]),
            ],
        )]);

        let result = run(per_hall);
        assert_eq!(result.meal_schedules.len(), 1);
        assert_eq!(result.meal_schedules[0].start_time, "2024-03-01 11:00:00-05");
        assert_eq!(result.meal_schedules[0].end_time, "2024-03-01 14:00:00-05");
        assert_eq!(result.menu_items.len(), 3);
    }

    #[test]
    fn test_records_carry_generation_time() {
        let now = Utc::now();
        let result = aggregate(
            &BTreeMap::from([(
                "a".to_string(),
                vec![block(MealPeriod::Lunch, Some("11:00 am - 2:00 pm"), &["Soup"])],
            )]),
            date(),
            UtcOffset::EASTERN_STANDARD,
            now,
        );
        assert_eq!(result.menu_items[0].created_at, now);
        assert_eq!(result.menu_items[0].updated_at, now);
        assert_eq!(result.meal_schedules[0].created_at, now);
    }
}
