use chrono::{Duration, NaiveDate};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// A staffing assignment as fetched from the project tracker: one developer
/// on one project (or sub-item) over a date span at a fractional allocation.
///
/// The aggregation core only requires `developer_id`, `start_date`, and
/// `ratio`; records missing the first two are skipped, a missing ratio
/// means full-time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subitem_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Open-ended when absent; the aggregator loads three months from the
    /// start in that case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Fraction of full-time in (0, 1]. Defaults to 1.0 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
}

impl Assignment {
    pub fn new(id: i32, developer_id: i32, developer_name: impl Into<String>) -> Self {
        Self {
            id,
            developer_id: Some(developer_id),
            developer_name: Some(developer_name.into()),
            position: None,
            project_id: None,
            subitem_id: None,
            start_date: None,
            end_date: None,
            ratio: None,
        }
    }

    pub fn to_dataframe_row(&self) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(9);

        let id_data: [i32; 1] = [self.id];
        columns.push(Series::new(PlSmallStr::from_static("id"), id_data).into_column());

        let developer_id: [Option<i32>; 1] = [self.developer_id];
        columns.push(
            Series::new(PlSmallStr::from_static("developer_id"), developer_id).into_column(),
        );

        let developer_name: [Option<&str>; 1] = [self.developer_name.as_deref()];
        columns.push(
            Series::new(PlSmallStr::from_static("developer_name"), developer_name).into_column(),
        );

        let position: [Option<&str>; 1] = [self.position.as_deref()];
        columns.push(Series::new(PlSmallStr::from_static("position"), position).into_column());

        let project_id: [Option<i32>; 1] = [self.project_id];
        columns.push(Series::new(PlSmallStr::from_static("project_id"), project_id).into_column());

        let subitem_id: [Option<i32>; 1] = [self.subitem_id];
        columns.push(Series::new(PlSmallStr::from_static("subitem_id"), subitem_id).into_column());

        columns.push(Self::series_from_date("start_date", self.start_date)?.into_column());
        columns.push(Self::series_from_date("end_date", self.end_date)?.into_column());

        let ratio: [Option<f64>; 1] = [self.ratio];
        columns.push(Series::new(PlSmallStr::from_static("ratio"), ratio).into_column());

        DataFrame::new(columns)
    }

    pub fn from_dataframe_row(df: &DataFrame, row_idx: usize) -> PolarsResult<Self> {
        let id = df
            .column("id")?
            .i32()?
            .get(row_idx)
            .ok_or_else(|| PolarsError::ComputeError("assignment row missing id".into()))?;

        Ok(Self {
            id,
            developer_id: df.column("developer_id")?.i32()?.get(row_idx),
            developer_name: df
                .column("developer_name")?
                .str()?
                .get(row_idx)
                .map(ToOwned::to_owned),
            position: df
                .column("position")?
                .str()?
                .get(row_idx)
                .map(ToOwned::to_owned),
            project_id: df.column("project_id")?.i32()?.get(row_idx),
            subitem_id: df.column("subitem_id")?.i32()?.get(row_idx),
            start_date: Self::date_from_series(df.column("start_date")?.date()?, row_idx),
            end_date: Self::date_from_series(df.column("end_date")?.date()?, row_idx),
            ratio: df.column("ratio")?.f64()?.get(row_idx),
        })
    }

    fn series_from_date(name: &str, date: Option<NaiveDate>) -> PolarsResult<Series> {
        let data: [Option<i32>; 1] = [date.map(Self::date_to_i32)];
        Series::new(name.into(), data).cast(&DataType::Date)
    }

    fn date_from_series(chunked: &DateChunked, row_idx: usize) -> Option<NaiveDate> {
        chunked.get(row_idx).map(Self::date_from_i32)
    }

    fn date_to_i32(date: NaiveDate) -> i32 {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        (date - epoch).num_days() as i32
    }

    fn date_from_i32(days: i32) -> NaiveDate {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        epoch + Duration::days(days as i64)
    }
}
