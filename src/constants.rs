/// Default log directive for the application
pub const LOG_DIRECTIVE: &str = "birthday_skill=info";

/// Local hour of day at which birthday reminders fire
pub const REMINDER_LOCAL_HOUR: u32 = 9;

/// Permission scope required to read the user's given name
pub const GIVEN_NAME_PERMISSION: &str = "alexa::profile:given_name:read";

/// Permission scope required to manage reminders
pub const REMINDERS_PERMISSION: &str = "alexa::alerts:reminders:skill:readwrite";

/// Public SPARQL endpoint of the notable-birthdays dataset
pub const DATASET_ENDPOINT: &str = "https://query.wikidata.org/sparql";

/// Number of notable people fetched per dataset query
pub const DATASET_FETCH_LIMIT: u32 = 5;
