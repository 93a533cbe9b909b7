//! Plate acquisition ("run") marshalling.

use chrono::{TimeZone, Utc};
use tracing::debug;

use cellarium_core::{
    col, map_columns, permissions_css, AcquisitionRecord, CallContext, Page, QueryParams, Result,
    ServiceOptions, Value,
};

use crate::Browser;

pub(crate) const ACQUISITION_COLUMNS: [&str; 6] =
    ["id", "name", "ownerId", "perms", "startTime", "endTime"];

/// Render an epoch-millisecond timestamp as a UTC `YYYY-MM-DD HH:MM:SS`
/// string. Out-of-range values decode to `None` and fall through to the
/// id-based name.
fn format_utc(millis: i64) -> Option<String> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Decode an acquisition row: id, name, ownerId, permission descriptor,
/// startTime, endTime. Shared with the tagged fan-out.
///
/// The record name is the stored name when set; otherwise, when both
/// timestamps are present, a `start - end` rendering; otherwise `Run <id>`.
pub(crate) fn record_acquisition(row: &[Value], ctx: &CallContext) -> Result<AcquisitionRecord> {
    let id = col(row, 0)?.as_long()?;
    let owner_id = col(row, 2)?.as_long()?;

    let start = col(row, 4)?.as_opt_time()?.and_then(format_utc);
    let end = col(row, 5)?.as_opt_time()?.and_then(format_utc);

    let name = match col(row, 1)?.as_opt_text()? {
        Some(name) => name,
        None => match (start, end) {
            (Some(start), Some(end)) => format!("{start} - {end}"),
            _ => format!("Run {id}"),
        },
    };

    Ok(AcquisitionRecord {
        id,
        name,
        owner_id,
        perms_css: permissions_css(col(row, 3)?.as_perms()?, owner_id, ctx),
    })
}

impl Browser {
    /// Marshal the acquisition runs of one plate. Runs are addressed by
    /// global plate id, so the query spans all groups and orders by run id.
    pub async fn marshal_plate_acquisitions(
        &self,
        plate_id: i64,
        page: &Page,
    ) -> Result<Vec<AcquisitionRecord>> {
        let mut params = QueryParams::new();
        let opts = ServiceOptions::all_groups();

        params.paginate(page.number, self.limit_for(page));
        params.add_long("pid", plate_id);

        let q = r#"
            select new map(pa.id as id,
                   pa.name as name,
                   pa.details.owner.id as ownerId,
                   pa.details.permissions as perms,
                   pa.startTime as startTime,
                   pa.endTime as endTime)
            from PlateAcquisition pa
            where pa.plate.id = :pid
            order by pa.id
            "#;

        let mut acquisitions = Vec::new();
        for row in self.svc.projection(q, &params, &opts).await? {
            let columns = map_columns(&row, &ACQUISITION_COLUMNS)?;
            acquisitions.push(record_acquisition(&columns, &self.ctx)?);
        }
        debug!(result_count = acquisitions.len(), "marshal_plate_acquisitions");
        Ok(acquisitions)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cellarium_core::{CallContext, GroupScope, Page, Param, Value};

    use crate::test_fixtures::{full_perms, map_row, ScriptedQueryService, StaticShares};
    use crate::Browser;

    fn setup() -> (Arc<ScriptedQueryService>, Browser) {
        let svc = Arc::new(ScriptedQueryService::new());
        let browser = Browser::new(
            svc.clone(),
            Arc::new(StaticShares::new()),
            CallContext::new(5),
        );
        (svc, browser)
    }

    fn acquisition_row(id: i64, name: Value, start: Value, end: Value) -> Vec<Value> {
        map_row(&[
            ("id", Value::Long(id)),
            ("name", name),
            ("ownerId", Value::Long(5)),
            ("perms", full_perms()),
            ("startTime", start),
            ("endTime", end),
        ])
    }

    #[tokio::test]
    async fn explicit_name_used_verbatim() {
        let (svc, browser) = setup();
        svc.enqueue(vec![acquisition_row(
            1,
            Value::from("Morning run"),
            Value::Time(0),
            Value::Time(1000),
        )]);

        let runs = browser
            .marshal_plate_acquisitions(40, &Page::first())
            .await
            .unwrap();
        assert_eq!(runs[0].name, "Morning run");
    }

    #[tokio::test]
    async fn missing_name_falls_back_to_timestamps() {
        let (svc, browser) = setup();
        // 2015-05-01 12:00:00 UTC and one hour later.
        svc.enqueue(vec![acquisition_row(
            1,
            Value::Null,
            Value::Time(1_430_481_600_000),
            Value::Time(1_430_485_200_000),
        )]);

        let runs = browser
            .marshal_plate_acquisitions(40, &Page::first())
            .await
            .unwrap();
        assert_eq!(runs[0].name, "2015-05-01 12:00:00 - 2015-05-01 13:00:00");
    }

    #[tokio::test]
    async fn missing_everything_falls_back_to_run_id() {
        let (svc, browser) = setup();
        svc.enqueue(vec![acquisition_row(7, Value::Null, Value::Null, Value::Null)]);

        let runs = browser
            .marshal_plate_acquisitions(40, &Page::first())
            .await
            .unwrap();
        assert_eq!(runs[0].name, "Run 7");
    }

    #[tokio::test]
    async fn single_timestamp_is_not_enough() {
        let (svc, browser) = setup();
        svc.enqueue(vec![acquisition_row(
            8,
            Value::Null,
            Value::Time(1_430_481_600_000),
            Value::Null,
        )]);

        let runs = browser
            .marshal_plate_acquisitions(40, &Page::first())
            .await
            .unwrap();
        assert_eq!(runs[0].name, "Run 8");
    }

    #[tokio::test]
    async fn queries_by_plate_across_groups_ordered_by_id() {
        let (svc, browser) = setup();

        browser
            .marshal_plate_acquisitions(40, &Page::first())
            .await
            .unwrap();

        let call = svc.only_call();
        assert_eq!(call.options.group, GroupScope::All);
        assert!(call.query.contains("pa.plate.id = :pid"));
        assert!(call.query.contains("order by pa.id"));
        assert_eq!(call.params.get("pid"), Some(&Param::Long(40)));
    }
}
