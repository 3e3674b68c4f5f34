//! Encoded polyline codec.
//!
//! Each coordinate is stored as a pair of signed deltas (latitude first) from
//! the previous coordinate, scaled by `10^precision`. Every delta is zig-zag
//! encoded and split into 5-bit chunks, least significant first; each chunk
//! but the last carries the `0x20` continuation bit and every chunk is offset
//! by 63 so the output stays in the printable `?`..`~` range.

use thiserror::Error;

use crate::geopoint::GeoPoint;

/// Precision of the shapes returned by Valhalla.
pub const VALHALLA_PRECISION: u32 = 6;

/// Precision of the original Google polyline format.
pub const GOOGLE_PRECISION: u32 = 5;

const CHUNK_OFFSET: u8 = 63;
const CONTINUATION_BIT: i64 = 0x20;
const CHUNK_MASK: i64 = 0x1f;
const LAST_CHUNK_MASK: u64 = 0x0f;

#[derive(Debug, Error, PartialEq)]
pub enum PolylineError {
    #[error("invalid character {character:?} at byte {index}")]
    InvalidCharacter { character: char, index: usize },
    #[error("polyline ends in the middle of a value")]
    Truncated,
    #[error("polyline ends with a latitude that has no longitude")]
    UnpairedCoordinate,
    #[error("value ending at byte {0} overflows 64 bits")]
    Overflow(usize),
}

/// Decodes the whole of `encoded` into `(lat, lng)` points.
pub fn decode(encoded: &str, precision: u32) -> Result<Vec<GeoPoint>, PolylineError> {
    let factor = 10_f64.powi(precision as i32);
    let bytes = encoded.as_bytes();

    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::with_capacity(bytes.len() / 4);

    while index < bytes.len() {
        lat = lat
            .checked_add(decode_value(bytes, &mut index)?)
            .ok_or(PolylineError::Overflow(index))?;
        if index >= bytes.len() {
            return Err(PolylineError::UnpairedCoordinate);
        }
        lng = lng
            .checked_add(decode_value(bytes, &mut index)?)
            .ok_or(PolylineError::Overflow(index))?;

        points.push(GeoPoint::new(lat as f64 / factor, lng as f64 / factor));
    }

    Ok(points)
}

fn decode_value(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let mut result: u64 = 0;
    let mut shift = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(PolylineError::Truncated);
        };

        if !(CHUNK_OFFSET..=CHUNK_OFFSET + 63).contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                character: byte as char,
                index: *index,
            });
        }

        let chunk = (byte - CHUNK_OFFSET) as u64;
        let bits = chunk & CHUNK_MASK as u64;

        // Only 4 bits are left at shift 60
        if shift > 60 || (shift == 60 && bits > LAST_CHUNK_MASK) {
            return Err(PolylineError::Overflow(*index));
        }

        result |= bits << shift;
        shift += 5;
        *index += 1;

        if chunk & CONTINUATION_BIT as u64 == 0 {
            break;
        }
    }

    // Zig-zag: odd values are negative
    let value = (result >> 1) as i64;
    Ok(if result & 1 == 1 { !value } else { value })
}

/// Encodes `points` so that [`decode`] at the same precision returns them
/// rounded to `10^-precision`.
pub fn encode(points: &[GeoPoint], precision: u32) -> String {
    let factor = 10_f64.powi(precision as i32);
    let mut output = String::with_capacity(points.len() * 8);

    let mut previous_lat: i64 = 0;
    let mut previous_lng: i64 = 0;

    for point in points {
        let lat = (point.lat * factor).round() as i64;
        let lng = (point.lng * factor).round() as i64;

        encode_value(lat - previous_lat, &mut output);
        encode_value(lng - previous_lng, &mut output);

        previous_lat = lat;
        previous_lng = lng;
    }

    output
}

fn encode_value(value: i64, output: &mut String) {
    let mut value = if value < 0 {
        !(value << 1)
    } else {
        value << 1
    };

    while value >= CONTINUATION_BIT {
        output.push((((value & CHUNK_MASK) | CONTINUATION_BIT) as u8 + CHUNK_OFFSET) as char);
        value >>= 5;
    }

    output.push((value as u8 + CHUNK_OFFSET) as char);
}
