use sea_orm::entity::prelude::*;

/// Singleton row (id=1) owning appointment id assignment. Read and
/// incremented only inside the same transaction as the appointment insert,
/// so two concurrent bookings can never observe the same next_id.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "appointment_counter")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub next_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
