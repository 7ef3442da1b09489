use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct GetCategorySummaryParams {
    pub category_id: i64,
}
