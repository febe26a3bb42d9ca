use std::time::Duration;

pub(crate) const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub(crate) const TICK_RATE: Duration = Duration::from_millis(200);
pub(crate) const STATUS_TTL: Duration = Duration::from_secs(5);

pub(crate) const ALERT_FILL_FIELDS: &str = "Please fill all fields!";
pub(crate) const ALERT_BAD_DATE: &str = "Please enter a valid date!";

pub(crate) const STATUS_ENTER_ADD: &str =
    "Type the task, Tab to the due date (YYYY-MM-DD), Enter to add, Esc to cancel";
pub(crate) const STATUS_SEEDING: &str = "Loading starter tasks…";
pub(crate) const STATUS_HELP: &str = "Keyboard reference — Enter/Esc to close";
pub(crate) const STATUS_CONFIRM_DELETE: &str =
    "Confirm deletion — arrows choose, Enter confirms, Esc cancels";
