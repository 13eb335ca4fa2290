//! Datum i det solära hijri-kalendern (jalali) och kalenderval
//!
//! Omvandlingen är ren aritmetik över 33-årscykeln och gäller för
//! alla datum programmet realistiskt stämplar.

use std::fmt;

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Ackumulerade dagar före varje gregoriansk månad (icke-skottår)
const GREGORIAN_DAYS_BEFORE_MONTH: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Ett datum i jalali-kalendern
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct JalaliDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl JalaliDate {
    /// Omvandla ett gregorianskt datum
    pub fn from_gregorian(date: NaiveDate) -> Self {
        let gy = date.year() as i64;
        let gm = date.month() as usize;
        let gd = date.day() as i64;

        let gy2 = if gm > 2 { gy + 1 } else { gy };
        let mut days = 355_666 + 365 * gy + (gy2 + 3) / 4 - (gy2 + 99) / 100 + (gy2 + 399) / 400
            + gd
            + GREGORIAN_DAYS_BEFORE_MONTH[gm - 1];

        let mut jy = -1595 + 33 * (days / 12_053);
        days %= 12_053;
        jy += 4 * (days / 1461);
        days %= 1461;
        if days > 365 {
            jy += (days - 1) / 365;
            days = (days - 1) % 365;
        }

        let (month, day) = if days < 186 {
            (1 + days / 31, 1 + days % 31)
        } else {
            (7 + (days - 186) / 30, 1 + (days - 186) % 30)
        };

        Self {
            year: jy as i32,
            month: month as u32,
            day: day as u32,
        }
    }

    /// Omvandla tillbaka till gregorianskt datum
    pub fn to_gregorian(&self) -> Option<NaiveDate> {
        if !(1..=12).contains(&self.month) || self.day == 0 || self.day > 31 {
            return None;
        }

        let jy = self.year as i64 + 1595;
        let jm = self.month as i64;
        let jd = self.day as i64;

        let month_offset = if jm < 7 { (jm - 1) * 31 } else { (jm - 7) * 30 + 186 };
        let mut days = -355_668 + 365 * jy + (jy / 33) * 8 + ((jy % 33) + 3) / 4 + jd + month_offset;

        let mut gy = 400 * (days / 146_097);
        days %= 146_097;
        if days > 36_524 {
            days -= 1;
            gy += 100 * (days / 36_524);
            days %= 36_524;
            if days >= 365 {
                days += 1;
            }
        }
        gy += 4 * (days / 1461);
        days %= 1461;
        if days > 365 {
            gy += (days - 1) / 365;
            days = (days - 1) % 365;
        }

        NaiveDate::from_yo_opt(gy as i32, (days + 1) as u32)
    }

    /// Antal dagar i årets sista månad avgör skottår
    pub fn is_leap_year(year: i32) -> bool {
        let next_nowruz = JalaliDate { year: year + 1, month: 1, day: 1 }.to_gregorian();
        next_nowruz
            .and_then(|d| d.checked_sub_signed(Duration::days(1)))
            .map(|last| JalaliDate::from_gregorian(last).day == 30)
            .unwrap_or(false)
    }

    pub fn days_in_month(year: i32, month: u32) -> u32 {
        match month {
            1..=6 => 31,
            7..=11 => 30,
            12 if Self::is_leap_year(year) => 30,
            12 => 29,
            _ => 0,
        }
    }

    /// Parsa `YYYY-MM-DD` och kontrollera att datumet finns
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.trim().splitn(3, '-');
        let year = parts.next()?.parse::<i32>().ok()?;
        let month = parts.next()?.parse::<u32>().ok()?;
        let day = parts.next()?.parse::<u32>().ok()?;

        if day == 0 || day > Self::days_in_month(year, month) {
            return None;
        }

        Some(Self { year, month, day })
    }
}

impl fmt::Display for JalaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Kalender som används när nya ärenden datumstämplas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Calendar {
    #[default]
    Jalali,
    Gregorian,
}

impl Calendar {
    /// Formatera ett datum i denna kalender
    pub fn format(&self, date: NaiveDate) -> String {
        match self {
            Self::Jalali => JalaliDate::from_gregorian(date).to_string(),
            Self::Gregorian => date.format("%Y-%m-%d").to_string(),
        }
    }

    /// Dagens datum som text
    pub fn today(&self) -> String {
        self.format(Local::now().date_naive())
    }

    /// Finns datumet `YYYY-MM-DD` i denna kalender
    pub fn is_valid_date(&self, s: &str) -> bool {
        match self {
            Self::Jalali => JalaliDate::parse(s).is_some(),
            Self::Gregorian => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").is_ok(),
        }
    }

    pub fn from_config_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "jalali" | "persian" | "shamsi" => Some(Self::Jalali),
            "gregorian" => Some(Self::Gregorian),
            _ => None,
        }
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jalali => write!(f, "jalali"),
            Self::Gregorian => write!(f, "gregorian"),
        }
    }
}
