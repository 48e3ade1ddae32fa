use serde::{Deserialize, Serialize};
use std::fmt;

use super::routing::{PlatformRoute, RegionalRoute};
use crate::constants::riot_id::{
    INVALID_CHARACTERS, MAX_GAME_NAME_LENGTH, MAX_TAG_LINE_LENGTH, MIN_GAME_NAME_LENGTH,
    MIN_TAG_LINE_LENGTH,
};
use crate::error::AppError;

/// Response body of the account lookup endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDto {
    pub puuid: String,
    #[serde(rename = "gameName", default)]
    pub game_name: Option<String>,
    #[serde(rename = "tagLine", default)]
    pub tag_line: Option<String>,
}

/// An account the user has signed in with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub game_name: String,
    pub tag_line: String,
    pub region: PlatformRoute,
    /// Set once the Riot ID has been resolved against the account endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub puuid: Option<String>,
}

impl Account {
    /// Creates an account after validating both parts of the Riot ID
    pub fn new(
        game_name: impl Into<String>,
        tag_line: impl Into<String>,
        region: PlatformRoute,
    ) -> Result<Self, AppError> {
        let game_name = game_name.into();
        let tag_line = tag_line.into();

        let status = validate_riot_id(&game_name, &tag_line);
        if status != RiotIdStatus::Valid {
            return Err(AppError::invalid_riot_id(
                format!("{game_name}#{tag_line}"),
                status.description(),
            ));
        }

        Ok(Self {
            game_name,
            tag_line,
            region,
            puuid: None,
        })
    }

    /// Parses a `GameName#TagLine` string
    pub fn parse(riot_id: &str, region: PlatformRoute) -> Result<Self, AppError> {
        let (game_name, tag_line) = riot_id
            .rsplit_once('#')
            .ok_or_else(|| AppError::invalid_riot_id(riot_id, "Expected GameName#TagLine"))?;
        Self::new(game_name, tag_line, region)
    }

    /// Creates an account that is addressed by PUUID only
    pub fn from_puuid(puuid: impl Into<String>, region: PlatformRoute) -> Self {
        Self {
            game_name: String::new(),
            tag_line: String::new(),
            region,
            puuid: Some(puuid.into()),
        }
    }

    pub fn riot_id(&self) -> String {
        format!("{}#{}", self.game_name, self.tag_line)
    }

    /// Routing key for the match and account endpoints
    pub fn continent(&self) -> RegionalRoute {
        self.region.to_regional()
    }

    /// Records the lookup result, keeping the canonical capitalisation the API returned
    pub fn apply_lookup(&mut self, dto: AccountDto) {
        if let Some(game_name) = dto.game_name {
            self.game_name = game_name;
        }
        if let Some(tag_line) = dto.tag_line {
            self.tag_line = tag_line;
        }
        self.puuid = Some(dto.puuid);
    }
}

/// Outcome of validating one part of a Riot ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiotIdStatus {
    Valid,
    TooShort,
    GameNameTooLong,
    TagLineTooLong,
    InvalidCharacters,
}

impl RiotIdStatus {
    pub fn description(&self) -> &'static str {
        match self {
            RiotIdStatus::Valid => "Valid",
            RiotIdStatus::TooShort => "Too Short",
            RiotIdStatus::GameNameTooLong => "Too long; 16 max",
            RiotIdStatus::TagLineTooLong => "Too long",
            RiotIdStatus::InvalidCharacters => "Invalid",
        }
    }
}

impl fmt::Display for RiotIdStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

fn has_invalid_characters(part: &str) -> bool {
    part.contains(INVALID_CHARACTERS) || part.contains("  ")
}

pub fn validate_game_name(game_name: &str) -> RiotIdStatus {
    if has_invalid_characters(game_name) {
        return RiotIdStatus::InvalidCharacters;
    }
    match game_name.chars().count() {
        n if n < MIN_GAME_NAME_LENGTH => RiotIdStatus::TooShort,
        n if n > MAX_GAME_NAME_LENGTH => RiotIdStatus::GameNameTooLong,
        _ => RiotIdStatus::Valid,
    }
}

pub fn validate_tag_line(tag_line: &str) -> RiotIdStatus {
    if has_invalid_characters(tag_line) {
        return RiotIdStatus::InvalidCharacters;
    }
    match tag_line.chars().count() {
        n if n < MIN_TAG_LINE_LENGTH => RiotIdStatus::TooShort,
        n if n > MAX_TAG_LINE_LENGTH => RiotIdStatus::TagLineTooLong,
        _ => RiotIdStatus::Valid,
    }
}

/// Validates both parts, reporting the game name's problem first
pub fn validate_riot_id(game_name: &str, tag_line: &str) -> RiotIdStatus {
    match validate_game_name(game_name) {
        RiotIdStatus::Valid => validate_tag_line(tag_line),
        status => status,
    }
}
