use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create patients table
        manager
            .create_table(
                Table::create()
                    .table(Patients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Patients::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Patients::PasswordHash)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Patients::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create caregivers table; namespace is independent of patients
        manager
            .create_table(
                Table::create()
                    .table(Caregivers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Caregivers::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Caregivers::PasswordHash)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Caregivers::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create vaccines table
        manager
            .create_table(
                Table::create()
                    .table(Vaccines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vaccines::Name)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Vaccines::Doses)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create availabilities table, one row per (date, caregiver)
        manager
            .create_table(
                Table::create()
                    .table(Availabilities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Availabilities::Date)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Availabilities::CaregiverUsername)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Availabilities::Available)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .primary_key(
                        Index::create()
                            .col(Availabilities::Date)
                            .col(Availabilities::CaregiverUsername),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_availabilities_caregiver")
                            .from(Availabilities::Table, Availabilities::CaregiverUsername)
                            .to(Caregivers::Table, Caregivers::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_availabilities_date")
                    .table(Availabilities::Table)
                    .col(Availabilities::Date)
                    .to_owned(),
            )
            .await?;

        // Create appointments table; ids are assigned from the counter row,
        // not an auto-increment column
        manager
            .create_table(
                Table::create()
                    .table(Appointments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Appointments::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Appointments::Date)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Appointments::PatientUsername)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Appointments::CaregiverUsername)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Appointments::VaccineName)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_patient")
                            .from(Appointments::Table, Appointments::PatientUsername)
                            .to(Patients::Table, Patients::Username),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_caregiver")
                            .from(Appointments::Table, Appointments::CaregiverUsername)
                            .to(Caregivers::Table, Caregivers::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_appointments_patient")
                    .table(Appointments::Table)
                    .col(Appointments::PatientUsername)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_appointments_caregiver")
                    .table(Appointments::Table)
                    .col(Appointments::CaregiverUsername)
                    .to_owned(),
            )
            .await?;

        // Create appointment_counter singleton table
        manager
            .create_table(
                Table::create()
                    .table(AppointmentCounter::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AppointmentCounter::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AppointmentCounter::NextId)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Insert singleton row with id=1, next_id=0
        manager
            .exec_stmt(
                Query::insert()
                    .into_table(AppointmentCounter::Table)
                    .columns([AppointmentCounter::Id, AppointmentCounter::NextId])
                    .values_panic([1.into(), 0.into()])
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AppointmentCounter::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Appointments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Availabilities::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Vaccines::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Caregivers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Patients::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Patients {
    Table,
    Username,
    PasswordHash,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Caregivers {
    Table,
    Username,
    PasswordHash,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Vaccines {
    Table,
    Name,
    Doses,
}

#[derive(DeriveIden)]
enum Availabilities {
    Table,
    Date,
    CaregiverUsername,
    Available,
}

#[derive(DeriveIden)]
enum Appointments {
    Table,
    Id,
    Date,
    PatientUsername,
    CaregiverUsername,
    VaccineName,
}

#[derive(DeriveIden)]
enum AppointmentCounter {
    Table,
    Id,
    NextId,
}
