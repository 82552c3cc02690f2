use poem_openapi::Object;

#[derive(Object, Debug)]
pub struct DishUpsertDto {
    pub storage_id: i64,
    #[oai(validator(min_length = 1))]
    pub title: String,
    #[oai(default)]
    pub description: String,
    /// Local timestamp, `YYYY-MM-DDTHH:MM`, no offset.
    pub expire_date: String,
    #[oai(default)]
    pub priority: String,
    #[oai(default)]
    pub dish_type: String,
    /// Omitted means "not specified".
    pub portions: Option<i32>,
}

#[derive(Object, Debug)]
pub struct StorageUpsertDto {
    #[oai(validator(min_length = 1))]
    pub title: String,
    #[oai(default)]
    pub description: String,
}

#[derive(Object, Debug)]
pub struct AlexaLinkDto {
    #[oai(validator(min_length = 1))]
    pub alexa_user_id: String,
}
