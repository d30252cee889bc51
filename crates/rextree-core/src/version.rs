//! ECMAScript language versions.

/// The versions a literal can be validated against. Ordered, so
/// feature thresholds read as plain comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EcmaVersion {
    Es5,
    Es2015,
    Es2016,
    Es2017,
    Es2018,
    Es2019,
    Es2020,
    Es2021,
    Es2022,
    Es2023,
    Es2024,
    Es2025,
}

impl EcmaVersion {
    pub const LATEST: EcmaVersion = EcmaVersion::Es2025;

    pub fn as_u16(self) -> u16 {
        match self {
            EcmaVersion::Es5 => 5,
            EcmaVersion::Es2015 => 2015,
            EcmaVersion::Es2016 => 2016,
            EcmaVersion::Es2017 => 2017,
            EcmaVersion::Es2018 => 2018,
            EcmaVersion::Es2019 => 2019,
            EcmaVersion::Es2020 => 2020,
            EcmaVersion::Es2021 => 2021,
            EcmaVersion::Es2022 => 2022,
            EcmaVersion::Es2023 => 2023,
            EcmaVersion::Es2024 => 2024,
            EcmaVersion::Es2025 => 2025,
        }
    }
}

impl TryFrom<u16> for EcmaVersion {
    type Error = u16;

    fn try_from(value: u16) -> Result<Self, u16> {
        match value {
            5 => Ok(EcmaVersion::Es5),
            2015 => Ok(EcmaVersion::Es2015),
            2016 => Ok(EcmaVersion::Es2016),
            2017 => Ok(EcmaVersion::Es2017),
            2018 => Ok(EcmaVersion::Es2018),
            2019 => Ok(EcmaVersion::Es2019),
            2020 => Ok(EcmaVersion::Es2020),
            2021 => Ok(EcmaVersion::Es2021),
            2022 => Ok(EcmaVersion::Es2022),
            2023 => Ok(EcmaVersion::Es2023),
            2024 => Ok(EcmaVersion::Es2024),
            2025 => Ok(EcmaVersion::Es2025),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for EcmaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}
