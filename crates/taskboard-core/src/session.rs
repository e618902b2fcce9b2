//! Per-session UI state.
//!
//! One [`Session`] lives for as long as a user is logged in. It carries the
//! list filter, search text, manual order, theme and the settings-page
//! profile, starts from the configured defaults, and returns to them on logout.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

use crate::error::ValidationError;
use crate::storage::UiConfig;
use crate::task::ordering::{TaskQuery, Visibility};

/// Color palette of a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub background: &'static str,
    pub foreground: &'static str,
    pub input: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(try_from = "String")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Green,
    Pink,
    Purple,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Dark,
        Theme::Light,
        Theme::Green,
        Theme::Pink,
        Theme::Purple,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
            Theme::Green => "Green",
            Theme::Pink => "Pink",
            Theme::Purple => "Purple",
        }
    }

    pub fn palette(self) -> Palette {
        let (background, foreground, input) = match self {
            Theme::Dark => ("#121212", "#eee", "#2c2c2c"),
            Theme::Light => ("#fafafa", "#111", "#fff"),
            Theme::Green => ("#e8f5e9", "#1b5e20", "#c8e6c9"),
            Theme::Pink => ("#fce4ec", "#880e4f", "#f8bbd0"),
            Theme::Purple => ("#f3e5f5", "#4a148c", "#e1bee7"),
        };
        Palette {
            background,
            foreground,
            input,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Theme {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownTheme(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(try_from = "String")]
pub enum Gender {
    #[default]
    #[serde(rename = "Prefer not to say")]
    PreferNotToSay,
    Female,
    Male,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 4] = [
        Gender::PreferNotToSay,
        Gender::Female,
        Gender::Male,
        Gender::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::PreferNotToSay => "Prefer not to say",
            Gender::Female => "Female",
            Gender::Male => "Male",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Gender {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownGender(s.to_string()))
    }
}

pub const MAX_AGE: u32 = 120;

/// Profile section of the settings page. Kept in the session only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: Gender,
    pub age: u32,
    /// Uploaded picture, already encoded by the front end. Never decoded here.
    pub picture: Option<String>,
}

impl Profile {
    /// # Errors
    /// Returns [`ValidationError::AgeOutOfRange`] when `age` exceeds [`MAX_AGE`].
    pub fn validate(self) -> Result<Self, ValidationError> {
        if self.age > MAX_AGE {
            return Err(ValidationError::AgeOutOfRange(self.age));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub logged_in: bool,
    pub email: Option<String>,
    pub theme: Theme,
    pub visibility: Visibility,
    pub search: String,
    pub manual_order: Option<Vec<i64>>,
    pub profile: Profile,
    defaults: UiConfig,
}

impl Session {
    /// Logged-out session seeded from the UI defaults.
    pub fn new(defaults: &UiConfig) -> Self {
        Self {
            logged_in: false,
            email: None,
            theme: defaults.theme,
            visibility: defaults.visibility,
            search: String::new(),
            manual_order: None,
            profile: Profile::default(),
            defaults: defaults.clone(),
        }
    }

    /// Mark the session logged in. Any non-empty email and password pass.
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingCredentials`] when either is blank.
    pub fn login(
        &mut self,
        email: &str,
        password: &str,
        theme: Option<Theme>,
    ) -> Result<(), ValidationError> {
        if email.trim().is_empty() || password.is_empty() {
            warn!("login rejected: missing credentials");
            return Err(ValidationError::MissingCredentials);
        }
        self.logged_in = true;
        self.email = Some(email.trim().to_string());
        self.profile.email = email.trim().to_string();
        if let Some(theme) = theme {
            self.theme = theme;
        }
        info!(email = %email.trim(), "logged in");
        Ok(())
    }

    /// Replace the profile. A non-blank email also becomes the session email.
    ///
    /// # Errors
    /// Rejects an out-of-range age, leaving the current profile untouched.
    pub fn save_profile(&mut self, profile: Profile) -> Result<(), ValidationError> {
        let profile = profile.validate()?;
        let email = profile.email.trim();
        if !email.is_empty() {
            self.email = Some(email.to_string());
        }
        self.profile = profile;
        info!("profile updated");
        Ok(())
    }

    /// Drop every piece of session state.
    pub fn logout(&mut self) {
        *self = Session::new(&self.defaults);
        info!("logged out");
    }

    /// Ordering/filtering inputs for the task list.
    pub fn query(&self) -> TaskQuery {
        TaskQuery {
            search: self.search.clone(),
            visibility: self.visibility,
            manual_order: self.manual_order.clone(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(&UiConfig::default())
    }
}
