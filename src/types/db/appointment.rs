use sea_orm::entity::prelude::*;

/// A booked appointment. Ids form a zero-based, gap-free sequence in
/// insertion order, assigned from the appointment_counter row inside the
/// booking transaction. Ids are never reused.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub date: Date,
    pub patient_username: String,
    pub caregiver_username: String,
    pub vaccine_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
