//! Device identity and statistics replies.

use crate::codec;
use crate::error::Result;

/// Firmware and API version. Tag 0x07.
///
/// Example frame: `07 09 01 0a 01 00 01 03 01 03 00`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VersionDetail {
    /// API version `[major, minor]`
    pub api: [u8; 2],
    /// Firmware version `[major, minor, patch]`
    pub firmware: [u8; 3],
}

impl VersionDetail {
    const API_OFFSET: usize = 6;
    const FIRMWARE_OFFSET: usize = 8;

    pub fn decode(frame: &[u8]) -> Result<Self> {
        let api = Self::API_OFFSET;
        let fw = Self::FIRMWARE_OFFSET;
        Ok(Self {
            api: [codec::read_uint8(frame, api)?, codec::read_uint8(frame, api + 1)?],
            firmware: [
                codec::read_uint8(frame, fw)?,
                codec::read_uint8(frame, fw + 1)?,
                codec::read_uint8(frame, fw + 2)?,
            ],
        })
    }
}

/// Bluetooth MAC address. Tag 0x42.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MacAddress {
    /// Lowercase hex octets joined by `:`
    pub mac: String,
}

impl MacAddress {
    const ADDRESS_OFFSET: usize = 2;

    pub fn decode(frame: &[u8]) -> Result<Self> {
        Ok(Self {
            mac: codec::hex_string(frame, Self::ADDRESS_OFFSET, ":"),
        })
    }
}

/// Train UUID. Tag 0x43.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TrainUuid {
    /// Lowercase hex, no separators
    pub uuid: String,
}

impl TrainUuid {
    const UUID_OFFSET: usize = 2;

    pub fn decode(frame: &[u8]) -> Result<Self> {
        Ok(Self {
            uuid: codec::hex_string(frame, Self::UUID_OFFSET, ""),
        })
    }
}

/// Lifetime distance travelled. Tag 0x3E.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StatsLifetimeOdometer {
    /// Distance (cm)
    pub odo_cm: u32,
}

impl StatsLifetimeOdometer {
    const ODOMETER_OFFSET: usize = 2;

    pub fn decode(frame: &[u8]) -> Result<Self> {
        Ok(Self {
            odo_cm: codec::read_uint32(frame, Self::ODOMETER_OFFSET)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_detail_sample() {
        let frame = [0x07, 0x09, 0x01, 0x0A, 0x01, 0x00, 0x01, 0x03, 0x01, 0x03, 0x00];
        let v = VersionDetail::decode(&frame).unwrap();
        assert_eq!(v.api, [1, 3]);
        assert_eq!(v.firmware, [1, 3, 0]);
    }

    #[test]
    fn version_detail_short() {
        let frame = [0x07, 0x09, 0x01, 0x0A, 0x01, 0x00, 0x01, 0x03, 0x01, 0x03];
        assert!(VersionDetail::decode(&frame).is_err());
    }

    #[test]
    fn mac_address_colon_joined() {
        let frame = [0x42, 0x06, 0xD4, 0xF5, 0x13, 0x0A, 0xBC, 0x01];
        let m = MacAddress::decode(&frame).unwrap();
        assert_eq!(m.mac, "d4:f5:13:0a:bc:01");
    }

    #[test]
    fn uuid_concatenated() {
        let frame = [0x43, 0x04, 0xDE, 0xAD, 0xBE, 0xEF];
        let u = TrainUuid::decode(&frame).unwrap();
        assert_eq!(u.uuid, "deadbeef");
    }

    #[test]
    fn odometer_300cm() {
        let frame = [0x3E, 0x00, 0x00, 0x00, 0x01, 0x2C];
        assert_eq!(StatsLifetimeOdometer::decode(&frame).unwrap().odo_cm, 300);
    }
}
