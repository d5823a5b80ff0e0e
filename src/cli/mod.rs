// CLI module - the interactive command loop

use std::io::Write;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app_data::AppData;
use crate::coordinators::BookingCoordinator;
use crate::errors::SchedulerError;
use crate::types::internal::Session;

/// Vaccine scheduler startup options
#[derive(Parser)]
#[command(name = "vaxsched")]
#[command(about = "Vaccine appointment scheduling CLI", long_about = None)]
pub struct Cli {
    /// Database URL; falls back to DATABASE_URL, then a local sqlite file
    #[arg(long)]
    pub database_url: Option<String>,
}

#[derive(Debug, PartialEq)]
enum LoopControl {
    Continue,
    Quit,
}

/// Interactive scheduler session
///
/// Owns the login state for the lifetime of the loop: one command is
/// processed to completion before the next line is read, and at most one
/// account is logged in at a time.
pub struct SchedulerCli {
    app_data: Arc<AppData>,
    booking_coordinator: BookingCoordinator,
    session: Session,
}

impl SchedulerCli {
    pub fn new(app_data: Arc<AppData>) -> Self {
        let booking_coordinator = BookingCoordinator::new(Arc::clone(&app_data));
        Self {
            app_data,
            booking_coordinator,
            session: Session::Anonymous,
        }
    }

    /// Run the read/dispatch loop until `quit` or end of input
    pub async fn run(&mut self) -> std::io::Result<()> {
        print_banner();

        let stdin = tokio::io::stdin();
        let mut lines = BufReader::new(stdin).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            if let LoopControl::Quit = self.execute(&line).await {
                break;
            }
        }

        Ok(())
    }

    async fn execute(&mut self, line: &str) -> LoopControl {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        // A blank line carries no operation name, so it is reported as one.
        let operation = tokens.first().copied().unwrap_or("");

        let result = match operation {
            "create_patient" => self.create_patient(&tokens).await,
            "create_caregiver" => self.create_caregiver(&tokens).await,
            "login_patient" => self.login_patient(&tokens).await,
            "login_caregiver" => self.login_caregiver(&tokens).await,
            "search_caregiver_schedule" => self.search_caregiver_schedule(&tokens).await,
            "reserve" => self.reserve(&tokens).await,
            "upload_availability" => self.upload_availability(&tokens).await,
            // Recognized but deliberately without effect
            "cancel" => Ok(()),
            "add_doses" => self.add_doses(&tokens).await,
            "show_appointments" => self.show_appointments(&tokens).await,
            "logout" => self.logout(&tokens),
            "quit" => {
                println!("Bye!");
                return LoopControl::Quit;
            }
            _ => {
                println!("Invalid operation name!");
                return LoopControl::Continue;
            }
        };

        if let Err(err) = result {
            report(operation, err);
        }

        LoopControl::Continue
    }

    async fn create_patient(&mut self, tokens: &[&str]) -> Result<(), SchedulerError> {
        let &[_, username, password] = tokens else {
            return Err(SchedulerError::InvalidArgument);
        };

        self.app_data
            .credential_store
            .create_patient(&self.app_data.db, username, password)
            .await?;

        // The freshly created account becomes the active session
        self.session = Session::Patient(username.to_string());
        println!("Created user {}", username);
        Ok(())
    }

    async fn create_caregiver(&mut self, tokens: &[&str]) -> Result<(), SchedulerError> {
        let &[_, username, password] = tokens else {
            return Err(SchedulerError::InvalidArgument);
        };

        self.app_data
            .credential_store
            .create_caregiver(&self.app_data.db, username, password)
            .await?;

        self.session = Session::Caregiver(username.to_string());
        println!("Created user {}", username);
        Ok(())
    }

    async fn login_patient(&mut self, tokens: &[&str]) -> Result<(), SchedulerError> {
        if self.session.is_logged_in() {
            return Err(SchedulerError::AlreadyLoggedIn);
        }
        let &[_, username, password] = tokens else {
            return Err(SchedulerError::InvalidArgument);
        };

        self.app_data
            .credential_store
            .verify_patient(&self.app_data.db, username, password)
            .await?;

        self.session = Session::Patient(username.to_string());
        println!("Logged in as: {}", username);
        Ok(())
    }

    async fn login_caregiver(&mut self, tokens: &[&str]) -> Result<(), SchedulerError> {
        if self.session.is_logged_in() {
            return Err(SchedulerError::AlreadyLoggedIn);
        }
        let &[_, username, password] = tokens else {
            return Err(SchedulerError::InvalidArgument);
        };

        self.app_data
            .credential_store
            .verify_caregiver(&self.app_data.db, username, password)
            .await?;

        self.session = Session::Caregiver(username.to_string());
        println!("Logged in as: {}", username);
        Ok(())
    }

    async fn search_caregiver_schedule(&self, tokens: &[&str]) -> Result<(), SchedulerError> {
        let &[_, raw_date] = tokens else {
            return Err(SchedulerError::InvalidArgument);
        };
        if !self.session.is_logged_in() {
            return Err(SchedulerError::LoginRequired);
        }
        let date = parse_date(raw_date)?;

        let caregivers = self
            .app_data
            .availability_ledger
            .find_available(&self.app_data.db, date)
            .await?;
        let vaccines = self.app_data.vaccine_inventory.list(&self.app_data.db).await?;

        for caregiver in &caregivers {
            for vaccine in &vaccines {
                println!("{} {} {}", caregiver, vaccine.name, vaccine.doses);
            }
        }
        Ok(())
    }

    async fn reserve(&self, tokens: &[&str]) -> Result<(), SchedulerError> {
        let Some(patient) = self.session.patient() else {
            return Err(if self.session.is_logged_in() {
                SchedulerError::PatientRequired
            } else {
                SchedulerError::LoginRequired
            });
        };
        let patient = patient.to_string();
        let &[_, raw_date, vaccine_name] = tokens else {
            return Err(SchedulerError::InvalidArgument);
        };
        let date = parse_date(raw_date)?;

        let reservation = self
            .booking_coordinator
            .reserve(date, vaccine_name, &patient)
            .await?;

        println!(
            "Appointment ID: {{{}}}, Caregiver username: {{{}}}",
            reservation.appointment_id, reservation.caregiver_username
        );
        Ok(())
    }

    async fn upload_availability(&self, tokens: &[&str]) -> Result<(), SchedulerError> {
        let caregiver = self
            .session
            .caregiver()
            .ok_or(SchedulerError::CaregiverRequired)?
            .to_string();
        let &[_, raw_date] = tokens else {
            return Err(SchedulerError::InvalidArgument);
        };
        let date = parse_date(raw_date)?;

        self.app_data
            .availability_ledger
            .publish(&self.app_data.db, &caregiver, date)
            .await?;

        println!("Availability uploaded!");
        Ok(())
    }

    async fn add_doses(&self, tokens: &[&str]) -> Result<(), SchedulerError> {
        if self.session.caregiver().is_none() {
            return Err(SchedulerError::CaregiverRequired);
        }
        let &[_, vaccine_name, raw_amount] = tokens else {
            return Err(SchedulerError::InvalidArgument);
        };
        let amount: i64 = raw_amount
            .parse()
            .map_err(|_| SchedulerError::InvalidArgument)?;
        if amount <= 0 {
            return Err(SchedulerError::InvalidArgument);
        }

        let inventory = &self.app_data.vaccine_inventory;
        match inventory.get(&self.app_data.db, vaccine_name).await? {
            Some(_) => inventory.increase(&self.app_data.db, vaccine_name, amount).await?,
            None => inventory.create(&self.app_data.db, vaccine_name, amount).await?,
        }

        println!("Doses updated!");
        Ok(())
    }

    async fn show_appointments(&self, tokens: &[&str]) -> Result<(), SchedulerError> {
        let &[_] = tokens else {
            return Err(SchedulerError::InvalidArgument);
        };

        let ledger = &self.app_data.appointment_ledger;
        match &self.session {
            Session::Anonymous => return Err(SchedulerError::LoginRequired),
            Session::Caregiver(username) => {
                for a in ledger.list_for_caregiver(&self.app_data.db, username).await? {
                    println!(
                        "Appointment id: {}, Vaccine Name: {}, Date: {}, Patient Name: {}",
                        a.id, a.vaccine_name, a.date, a.patient_username
                    );
                }
            }
            Session::Patient(username) => {
                for a in ledger.list_for_patient(&self.app_data.db, username).await? {
                    println!(
                        "Appointment id: {}, Vaccine Name: {}, Date: {}, Caregiver Name: {}",
                        a.id, a.vaccine_name, a.date, a.caregiver_username
                    );
                }
            }
        }
        Ok(())
    }

    fn logout(&mut self, tokens: &[&str]) -> Result<(), SchedulerError> {
        let &[_] = tokens else {
            return Err(SchedulerError::InvalidArgument);
        };
        if !self.session.is_logged_in() {
            return Err(SchedulerError::LoginRequired);
        }

        self.session = Session::Anonymous;
        println!("Successfully logged out!");
        Ok(())
    }
}

/// Parse an ISO calendar date, the only accepted literal format
fn parse_date(raw: &str) -> Result<NaiveDate, SchedulerError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| SchedulerError::InvalidDate)
}

/// Report a failed command as a single human-readable line
///
/// Store/infrastructure failures keep their detail in the log and surface as
/// the command's generic failure line. Account commands reuse that line for
/// malformed arity as well.
fn report(operation: &str, err: SchedulerError) {
    match err {
        SchedulerError::Internal(internal) => {
            tracing::error!(error = %internal, command = operation, "command failed");
            println!("{}", failure_line(operation));
        }
        SchedulerError::InvalidArgument
            if matches!(
                operation,
                "create_patient" | "create_caregiver" | "login_patient" | "login_caregiver"
            ) =>
        {
            println!("{}", failure_line(operation));
        }
        other => println!("{}", other),
    }
}

fn failure_line(operation: &str) -> &'static str {
    match operation {
        "create_patient" | "create_caregiver" => "Failed to create user.",
        "login_patient" | "login_caregiver" => "Login failed.",
        "upload_availability" => "Error occurred when uploading availability",
        "add_doses" => "Error occurred when adding doses",
        "reserve" => "Error occurred when making a reservation",
        "search_caregiver_schedule" => "Error occurred when searching the schedule",
        "show_appointments" => "Error occurred when listing appointments",
        _ => "Please try again!",
    }
}

fn print_banner() {
    println!();
    println!("Welcome to the COVID-19 Vaccine Reservation Scheduling Application!");
    println!("*** Please enter one of the following commands ***");
    println!("> create_patient <username> <password>");
    println!("> create_caregiver <username> <password>");
    println!("> login_patient <username> <password>");
    println!("> login_caregiver <username> <password>");
    println!("> search_caregiver_schedule <date>");
    println!("> reserve <date> <vaccine>");
    println!("> upload_availability <date>");
    println!("> cancel <appointment_id>");
    println!("> add_doses <vaccine> <number>");
    println!("> show_appointments");
    println!("> logout");
    println!("> quit");
    println!();
}
