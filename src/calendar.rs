use crate::model::{Phase, Project};
use chrono::{Datelike, NaiveDate};

/// Month under display, 1-based month number. Advancing wraps across year
/// boundaries without bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventEntry {
    pub project: usize,
    pub phase: Phase,
}

#[derive(Debug, Clone)]
pub struct DayCell {
    pub date: NaiveDate,
    pub events: Vec<EventEntry>,
}

#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

impl MonthCursor {
    pub fn from_date(date: NaiveDate) -> MonthCursor {
        MonthCursor {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn advance(self, delta: i32) -> MonthCursor {
        let month0 = self.month as i32 - 1 + delta;
        MonthCursor {
            year: self.year + month0.div_euclid(12),
            month: (month0.rem_euclid(12) + 1) as u32,
        }
    }

    pub fn title(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|date| date.format("%B %Y").to_string())
            .unwrap_or_default()
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .and_then(|date| date.pred_opt())
        .map(|date| date.day())
        .unwrap_or(0)
}

/// Sunday-start grid for one month: the number of blank cells before day 1
/// and one cell per day with the schedule phases landing on it.
pub fn month_grid(year: i32, month: u32, projects: &[Project]) -> MonthGrid {
    let leading_blanks = NaiveDate::from_ymd_opt(year, month, 1)
        .map(|date| date.weekday().num_days_from_sunday())
        .unwrap_or(0);
    let mut days = Vec::new();
    for day in 1..=days_in_month(year, month) {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            days.push(DayCell {
                date,
                events: events_on(projects, date),
            });
        }
    }
    MonthGrid {
        year,
        month,
        leading_blanks,
        days,
    }
}

/// Schedule phases landing exactly on `date`, scanning projects in dataset
/// order and phases in fixed order.
pub fn events_on(projects: &[Project], date: NaiveDate) -> Vec<EventEntry> {
    let mut events = Vec::new();
    for (idx, project) in projects.iter().enumerate() {
        for (phase, phase_date) in project.schedule.phases() {
            if phase_date == date {
                events.push(EventEntry {
                    project: idx,
                    phase,
                });
            }
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{date, project};

    #[test]
    fn leap_february_has_29_cells() {
        let grid = month_grid(2024, 2, &[]);
        assert_eq!(grid.days.len(), 29);
        assert_eq!(grid.leading_blanks, 4);
        assert_eq!(grid.days[0].date, date(2024, 2, 1));
        assert_eq!(grid.days[28].date, date(2024, 2, 29));
    }

    #[test]
    fn common_february_has_28_cells() {
        let grid = month_grid(2023, 2, &[]);
        assert_eq!(grid.days.len(), 28);
        assert_eq!(grid.leading_blanks, 3);
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn a_day_lists_exactly_the_phases_landing_on_it() {
        let mut p = project("proj_001", "Festival Groove");
        p.schedule.teaser = date(2025, 6, 1);
        p.schedule.countdown = date(2025, 6, 1);
        p.schedule.event = date(2025, 6, 15);
        p.schedule.thanks = date(2025, 6, 17);
        p.schedule.impact = date(2025, 7, 1);
        let projects = vec![p];

        let grid = month_grid(2025, 6, &projects);
        let first = &grid.days[0];
        assert_eq!(
            first.events,
            vec![
                EventEntry {
                    project: 0,
                    phase: Phase::Teaser
                },
                EventEntry {
                    project: 0,
                    phase: Phase::Countdown
                },
            ]
        );
        assert!(grid.days[1].events.is_empty());
        assert_eq!(grid.days[14].events.len(), 1);
        assert_eq!(grid.days[14].events[0].phase, Phase::Event);
        let july = month_grid(2025, 7, &projects);
        assert_eq!(july.days[0].events[0].phase, Phase::Impact);
    }

    #[test]
    fn shared_dates_keep_dataset_order() {
        let mut a = project("proj_001", "A");
        a.schedule.event = date(2025, 6, 10);
        let mut b = project("proj_002", "B");
        b.schedule.countdown = date(2025, 6, 10);
        let projects = vec![a, b];
        let events = events_on(&projects, date(2025, 6, 10));
        assert_eq!(
            events,
            vec![
                EventEntry {
                    project: 0,
                    phase: Phase::Event
                },
                EventEntry {
                    project: 1,
                    phase: Phase::Countdown
                },
            ]
        );
    }

    #[test]
    fn advancing_wraps_across_year_boundaries() {
        let december = MonthCursor {
            year: 2025,
            month: 12,
        };
        assert_eq!(
            december.advance(1),
            MonthCursor {
                year: 2026,
                month: 1
            }
        );
        let january = MonthCursor {
            year: 2026,
            month: 1,
        };
        assert_eq!(
            january.advance(-1),
            MonthCursor {
                year: 2025,
                month: 12
            }
        );
    }

    #[test]
    fn advance_is_inverse_consistent() {
        let mut cursor = MonthCursor {
            year: 2025,
            month: 8,
        };
        for _ in 0..30 {
            cursor = cursor.advance(1);
        }
        for _ in 0..30 {
            cursor = cursor.advance(-1);
        }
        assert_eq!(
            cursor,
            MonthCursor {
                year: 2025,
                month: 8
            }
        );
    }

    #[test]
    fn cursor_titles_use_month_names() {
        let cursor = MonthCursor {
            year: 2026,
            month: 9,
        };
        assert_eq!(cursor.title(), "September 2026");
    }
}
