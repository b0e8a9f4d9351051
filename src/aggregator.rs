use chrono::{Local, NaiveDate};
use digest_api::client::ScoreboardApi;
use digest_api::{DateKey, DayScores, League, ScoreboardResult};
use log::{debug, error};
use serde::Serialize;

/// Everything gathered in one run. Field names are the payload keys the
/// prompt refers to.
#[derive(Debug, Serialize)]
pub struct Report {
    #[serde(rename = "hoje")]
    pub today: DayScores,
    #[serde(rename = "ontem")]
    pub yesterday: DayScores,
    #[serde(rename = "mensagem")]
    pub summary: String,
}

impl Report {
    pub fn is_complete(&self) -> bool {
        self.today.is_complete() && self.yesterday.is_complete()
    }
}

/// Date keys for `today` and the calendar day before it.
pub fn day_keys(today: NaiveDate) -> (DateKey, DateKey) {
    let yesterday = today.pred_opt().unwrap_or(today);
    (DateKey::from_date(today), DateKey::from_date(yesterday))
}

pub struct Aggregator<'a> {
    api: &'a ScoreboardApi,
}

impl<'a> Aggregator<'a> {
    pub fn new(api: &'a ScoreboardApi) -> Self {
        Self { api }
    }

    /// Today per the local clock.
    pub async fn aggregate(&self) -> Report {
        self.aggregate_on(Local::now().date_naive()).await
    }

    /// All leagues for `today`, then all leagues for the day before, one
    /// request at a time. Never fails: a league that couldn't be fetched is
    /// kept as an `Err` entry.
    pub async fn aggregate_on(&self, today: NaiveDate) -> Report {
        let (today_key, yesterday_key) = day_keys(today);
        let today = self.collect_day(today_key).await;
        let yesterday = self.collect_day(yesterday_key).await;
        Report { today, yesterday, summary: String::new() }
    }

    async fn collect_day(&self, date: DateKey) -> DayScores {
        let mut day = DayScores::new(date);
        for league in League::ALL {
            let result = self.fetch(league, &day.date).await;
            day.insert(league, result);
        }
        day
    }

    /// One scoreboard, failures logged rather than returned up the stack.
    pub async fn fetch(&self, league: League, date: &DateKey) -> ScoreboardResult {
        debug!("fetching {league} scoreboard for {date}");
        let result = self.api.fetch_scoreboard(league, date).await;
        if let Err(e) = &result {
            error!("error fetching data from API {league}: {e}");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::time::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn yesterday_is_previous_calendar_day() {
        let (today, yesterday) = day_keys(date(2024, 3, 15));
        assert_eq!(today.as_str(), "20240315");
        assert_eq!(yesterday.as_str(), "20240314");
    }

    #[test]
    fn yesterday_crosses_leap_day() {
        let (today, yesterday) = day_keys(date(2024, 3, 1));
        assert_eq!(today.as_str(), "20240301");
        assert_eq!(yesterday.as_str(), "20240229");
    }

    #[test]
    fn yesterday_crosses_year_end() {
        let (_, yesterday) = day_keys(date(2025, 1, 1));
        assert_eq!(yesterday.as_str(), "20241231");
    }

    #[tokio::test]
    async fn all_leagues_present_even_when_one_fails() {
        let mut server = mockito::Server::new_async().await;
        let mut mocks = Vec::new();
        for path in ["/baseball/mlb/scoreboard", "/basketball/nba/scoreboard"] {
            for key in ["20240301", "20240229"] {
                mocks.push(
                    server
                        .mock("GET", path)
                        .match_query(Matcher::UrlEncoded("dates".into(), key.into()))
                        .with_status(200)
                        .with_body(format!(r#"{{"day":"{key}"}}"#))
                        .expect(1)
                        .create_async()
                        .await,
                );
            }
        }
        let nfl = server
            .mock("GET", "/football/nfl/scoreboard")
            .match_query(Matcher::Any)
            .with_status(500)
            .expect(2)
            .create_async()
            .await;

        let api = ScoreboardApi::new(&server.url(), Duration::from_secs(5));
        let report = Aggregator::new(&api).aggregate_on(date(2024, 3, 1)).await;

        assert!(report.is_complete());
        assert_eq!(report.today.date.as_str(), "20240301");
        assert_eq!(report.yesterday.date.as_str(), "20240229");
        for day in [&report.today, &report.yesterday] {
            let nfl_result = day.get(League::Nfl).unwrap();
            assert_eq!(
                nfl_result.as_ref().unwrap_err().status().map(|s| s.as_u16()),
                Some(500)
            );
            let mlb = day.get(League::Mlb).unwrap().as_ref().unwrap();
            assert_eq!(mlb["day"], day.date.as_str());
        }

        let payload = serde_json::to_value(&report).unwrap();
        assert!(payload["hoje"]["nfl"].is_null());
        assert!(payload["ontem"]["nfl"].is_null());
        assert_eq!(payload["ontem"]["nba"]["day"], "20240229");
        assert_eq!(payload["mensagem"], "");

        for mock in mocks {
            mock.assert_async().await;
        }
        nfl.assert_async().await;
    }

    #[tokio::test]
    async fn every_fetch_failing_still_yields_full_shape() {
        // No mocks: the server rejects everything with 501.
        let server = mockito::Server::new_async().await;
        let api = ScoreboardApi::new(&server.url(), Duration::from_secs(2));
        let report = Aggregator::new(&api).aggregate_on(date(2024, 3, 15)).await;

        assert!(report.is_complete());
        assert!(report.today.leagues.values().all(|r| r.is_err()));
        assert!(report.yesterday.leagues.values().all(|r| r.is_err()));

        let payload = serde_json::to_value(&report).unwrap();
        for bucket in ["hoje", "ontem"] {
            for league in ["mlb", "nfl", "nba"] {
                assert!(payload[bucket][league].is_null(), "{bucket}.{league}");
            }
        }
    }
}
