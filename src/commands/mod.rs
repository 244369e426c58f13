//! Method-dispatch command surface
//!
//! Hosts that address the tracker by method name (`"init"`,
//! `"getCurrentSpeed"`) go through [`Cursometer::dispatch`]. A missing or
//! falsy method name, or a bare options object, means `init`.

pub mod replay;

use crate::capture::types::ElementId;
use crate::error::{TrackerError, TrackerResult};
use crate::host::{Clock, Scheduler};
use crate::tracker::config::TrackerOptions;
use crate::tracker::Cursometer;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Known command names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Init,
    GetCurrentSpeed,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Init => "init",
            Command::GetCurrentSpeed => "getCurrentSpeed",
        }
    }
}

impl FromStr for Command {
    type Err = TrackerError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "init" => Ok(Command::Init),
            "getCurrentSpeed" => Ok(Command::GetCurrentSpeed),
            other => Err(TrackerError::UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One call into the command surface
#[derive(Debug, Clone, Default)]
pub enum Invocation {
    /// No arguments: `init` with default options
    #[default]
    Default,
    /// Options object in method position: `init` with those options
    Options(TrackerOptions),
    /// Named method with optional options argument
    Method {
        name: String,
        options: Option<TrackerOptions>,
    },
}

impl Invocation {
    pub fn method(name: impl Into<String>) -> Self {
        Invocation::Method {
            name: name.into(),
            options: None,
        }
    }

    /// Interpret a JSON argument the way a scripting host would pass it
    ///
    /// Falsy values (`null`, `false`, `0`, `""`) are `Default`, an object is
    /// `Options`, a string is a method name. Anything else names no method.
    pub fn from_json(value: &serde_json::Value) -> TrackerResult<Self> {
        match value {
            serde_json::Value::Null | serde_json::Value::Bool(false) => Ok(Invocation::Default),
            serde_json::Value::Number(n) if n.as_f64() == Some(0.0) => Ok(Invocation::Default),
            serde_json::Value::String(name) if name.is_empty() => Ok(Invocation::Default),
            serde_json::Value::Object(_) => Ok(Invocation::Options(TrackerOptions::from_json(value)?)),
            serde_json::Value::String(name) => Ok(Invocation::method(name.clone())),
            other => Err(TrackerError::UnknownMethod(other.to_string())),
        }
    }
}

/// What a dispatched command returns
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandOutput {
    Elements(Vec<ElementId>),
    Speed(f64),
}

impl<S: Scheduler, C: Clock> Cursometer<S, C> {
    /// Run `invocation` against `elements`
    ///
    /// `getCurrentSpeed` reads the first element of the collection.
    pub fn dispatch(
        &mut self,
        elements: &[ElementId],
        invocation: Invocation,
    ) -> TrackerResult<CommandOutput> {
        let (command, options) = match invocation {
            Invocation::Default => (Command::Init, None),
            Invocation::Options(options) => (Command::Init, Some(options)),
            Invocation::Method { name, options } if name.is_empty() => (Command::Init, options),
            Invocation::Method { name, options } => (name.parse::<Command>()?, options),
        };

        tracing::trace!("dispatching {} on {} element(s)", command, elements.len());

        match command {
            Command::Init => {
                let options = options.unwrap_or_default();
                Ok(CommandOutput::Elements(self.initialize(elements, &options)))
            }
            Command::GetCurrentSpeed => {
                let element = elements.first().copied().ok_or(TrackerError::EmptySelection)?;
                Ok(CommandOutput::Speed(self.get_current_speed(element)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::manual::{ManualClock, ManualScheduler};
    use serde_json::json;

    fn tracker() -> Cursometer<ManualScheduler, ManualClock> {
        Cursometer::manual(0.0)
    }

    #[test]
    fn test_command_names() {
        assert_eq!("init".parse::<Command>().unwrap(), Command::Init);
        assert_eq!(
            "getCurrentSpeed".parse::<Command>().unwrap(),
            Command::GetCurrentSpeed
        );
        assert_eq!(Command::GetCurrentSpeed.to_string(), "getCurrentSpeed");
    }

    #[test]
    fn test_unknown_method_names_the_method() {
        let mut cursometer = tracker();
        let err = cursometer
            .dispatch(&[ElementId(1)], Invocation::method("explode"))
            .unwrap_err();

        match err {
            TrackerError::UnknownMethod(name) => assert_eq!(name, "explode"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_default_invocation_initializes() {
        let mut cursometer = tracker();
        let output = cursometer
            .dispatch(&[ElementId(4)], Invocation::Default)
            .unwrap();

        assert_eq!(output, CommandOutput::Elements(vec![ElementId(4)]));
        assert!(cursometer.is_initialized(ElementId(4)));
    }

    #[test]
    fn test_options_object_initializes() {
        let mut cursometer = tracker();
        let invocation = Invocation::from_json(&json!({ "pollIntervalMs": 10 })).unwrap();
        cursometer.dispatch(&[ElementId(1)], invocation).unwrap();

        let state = cursometer.state(ElementId(1)).unwrap();
        assert_eq!(state.config().poll_interval.as_millis(), 10);
    }

    #[test]
    fn test_get_current_speed_before_init() {
        let mut cursometer = tracker();
        let err = cursometer
            .dispatch(&[ElementId(9)], Invocation::method("getCurrentSpeed"))
            .unwrap_err();
        assert!(matches!(err, TrackerError::NotInitialized(ElementId(9))));
    }

    #[test]
    fn test_get_current_speed_on_empty_selection() {
        let mut cursometer = tracker();
        let err = cursometer
            .dispatch(&[], Invocation::method("getCurrentSpeed"))
            .unwrap_err();
        assert!(matches!(err, TrackerError::EmptySelection));
    }

    #[test]
    fn test_get_current_speed_after_init() {
        let mut cursometer = tracker();
        cursometer
            .dispatch(&[ElementId(1)], Invocation::method("init"))
            .unwrap();
        let output = cursometer
            .dispatch(&[ElementId(1)], Invocation::method("getCurrentSpeed"))
            .unwrap();
        assert_eq!(output, CommandOutput::Speed(0.0));
    }

    #[test]
    fn test_falsy_method_means_init() {
        for value in [json!(""), json!(false), json!(0), json!(null)] {
            let invocation = Invocation::from_json(&value).unwrap();
            assert!(matches!(invocation, Invocation::Default), "{value} should mean init");
        }

        let mut cursometer = tracker();
        let output = cursometer
            .dispatch(&[ElementId(2)], Invocation::method(""))
            .unwrap();
        assert_eq!(output, CommandOutput::Elements(vec![ElementId(2)]));
        assert!(cursometer.is_initialized(ElementId(2)));
    }

    #[test]
    fn test_non_string_method_is_unknown() {
        let err = Invocation::from_json(&json!(42)).unwrap_err();
        assert!(matches!(err, TrackerError::UnknownMethod(name) if name == "42"));
    }
}
