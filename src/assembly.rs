//! Two-pass forecast assembly
//!
//! Drives today pass -> multi-day pass -> merge over one fetched page as an
//! explicit state machine. Every transition consumes the state; an error or an
//! out-of-order step lands in `Failed` and stays there.

use crate::fetcher::RawHtml;
use crate::forecast_scraper::{CardPass, scrape_cards};
use crate::merger::merge;
use crate::models::{CurrentConditionsSnapshot, ForecastTable, ScrapeResult};
use crate::{ForecastError, Result};
use tracing::debug;

#[derive(Debug)]
pub enum ForecastAssembly {
    Init,
    TodayScraped {
        today: ScrapeResult,
    },
    OthersScraped {
        today: ScrapeResult,
        others: ScrapeResult,
    },
    Merged {
        snapshot: CurrentConditionsSnapshot,
        table: ForecastTable,
    },
    Failed(ForecastError),
}

impl ForecastAssembly {
    #[must_use]
    pub fn new() -> Self {
        Self::Init
    }

    #[must_use]
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::TodayScraped { .. } => "TodayScraped",
            Self::OthersScraped { .. } => "OthersScraped",
            Self::Merged { .. } => "Merged",
            Self::Failed(_) => "Failed",
        }
    }

    /// Init -> TodayScraped
    #[must_use]
    pub fn scrape_today(self, page: &RawHtml, year: i32) -> Self {
        match self {
            Self::Init => match scrape_cards(page, CardPass::Today, year) {
                Ok(today) => Self::TodayScraped { today },
                Err(e) => Self::Failed(e),
            },
            other => other.out_of_order("scrape_today"),
        }
    }

    /// TodayScraped -> OthersScraped
    #[must_use]
    pub fn scrape_others(self, page: &RawHtml, year: i32) -> Self {
        match self {
            Self::TodayScraped { today } => match scrape_cards(page, CardPass::Others, year) {
                Ok(others) => Self::OthersScraped { today, others },
                Err(e) => Self::Failed(e),
            },
            other => other.out_of_order("scrape_others"),
        }
    }

    /// OthersScraped -> Merged
    #[must_use]
    pub fn merge(self) -> Self {
        match self {
            Self::OthersScraped { mut today, others } => {
                let snapshot = today.snapshot.take().unwrap_or_default();
                match merge(today, others) {
                    Ok(table) => Self::Merged { snapshot, table },
                    Err(e) => Self::Failed(e),
                }
            }
            other => other.out_of_order("merge"),
        }
    }

    /// Merged output, or the error that stopped the assembly
    pub fn finish(self) -> Result<(CurrentConditionsSnapshot, ForecastTable)> {
        match self {
            Self::Merged { snapshot, table } => Ok((snapshot, table)),
            Self::Failed(e) => Err(e),
            other => Err(ForecastError::OutOfOrder {
                state: other.state_name(),
                step: "finish",
            }),
        }
    }

    /// Run all three steps over `page`
    pub fn assemble(page: &RawHtml, year: i32) -> Result<(CurrentConditionsSnapshot, ForecastTable)> {
        Self::new()
            .scrape_today(page, year)
            .scrape_others(page, year)
            .merge()
            .finish()
    }

    fn out_of_order(self, step: &'static str) -> Self {
        match self {
            failed @ Self::Failed(_) => failed,
            other => {
                debug!("Rejecting step '{}' in state {}", step, other.state_name());
                Self::Failed(ForecastError::OutOfOrder {
                    state: other.state_name(),
                    step,
                })
            }
        }
    }
}

impl Default for ForecastAssembly {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(cards: &[(&str, &str, &str)], with_precip: bool) -> RawHtml {
        let body: String = cards
            .iter()
            .map(|(class, dow, date)| {
                let precip = if with_precip {
                    r#"<div class="info precip"><p>30%</p></div>"#
                } else {
                    ""
                };
                format!(
                    r#"<a class="{class}" href="/d"><div class="date"><span>{dow}</span><span>{date}</span></div><div class="temps"><span>90°</span><span>/70°</span></div><span class="phrase">Storms</span>{precip}</a>"#
                )
            })
            .collect();
        RawHtml::new(format!(
            r#"<html><body><a class="recent-location-display" href="/r"><span>Little Rock, AR</span><span>81°</span></a>{body}</body></html>"#
        ))
    }

    fn week() -> RawHtml {
        page(
            &[
                ("forecast-list-card forecast-card today", "Mon", "6/12"),
                ("forecast-list-card forecast-card", "Tue", "6/13"),
                ("forecast-list-card forecast-card", "Wed", "6/14"),
            ],
            true,
        )
    }

    #[test]
    fn test_states_advance_in_order() {
        let html = week();
        let state = ForecastAssembly::new();
        assert_eq!(state.state_name(), "Init");
        let state = state.scrape_today(&html, 2023);
        assert_eq!(state.state_name(), "TodayScraped");
        let state = state.scrape_others(&html, 2023);
        assert_eq!(state.state_name(), "OthersScraped");
        let state = state.merge();
        assert_eq!(state.state_name(), "Merged");

        let (snapshot, table) = state.finish().unwrap();
        assert_eq!(snapshot.location_label, "Little Rock, AR");
        assert_eq!(snapshot.current_temperature, "81°");
        assert_eq!(table.len(), 3);
        assert_eq!(table.today().unwrap().date, "Mon 6/12/2023");
    }

    #[test]
    fn test_out_of_order_step_fails() {
        let state = ForecastAssembly::new().merge();
        assert_eq!(state.state_name(), "Failed");
        let err = state.finish().unwrap_err();
        assert!(matches!(
            err,
            ForecastError::OutOfOrder { state: "Init", step: "merge" }
        ));
    }

    #[test]
    fn test_failure_is_sticky() {
        let html = page(
            &[("forecast-list-card forecast-card today", "Mon", "6/12")],
            false,
        );
        let state = ForecastAssembly::new()
            .scrape_today(&html, 2023)
            .scrape_others(&html, 2023)
            .merge();
        let err = state.finish().unwrap_err();
        assert!(matches!(err, ForecastError::MalformedCard { .. }));
    }

    #[test]
    fn test_finish_before_merge_is_out_of_order() {
        let html = week();
        let err = ForecastAssembly::new()
            .scrape_today(&html, 2023)
            .finish()
            .unwrap_err();
        assert!(matches!(err, ForecastError::OutOfOrder { step: "finish", .. }));
    }

    #[test]
    fn test_assemble() {
        let (_, table) = ForecastAssembly::assemble(&week(), 2023).unwrap();
        let dates: Vec<_> = table.rows().iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, ["Mon 6/12/2023", "Tue 6/13/2023", "Wed 6/14/2023"]);
    }
}
