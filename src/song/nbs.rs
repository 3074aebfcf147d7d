// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Note Block Studio (.nbs) reader.
//!
//! Only what is needed to find custom instruments is kept. Note blocks are
//! walked and counted but not stored.
//!
//! Reference: <https://opennbs.org/nbs>

use nom::bytes::complete::take;
use nom::multi::count;
use nom::number::complete::{le_i32, le_u16, le_u8};
use nom::sequence::pair;
use nom::IResult;

use super::{CustomInstrument, Header, Song};

/// Newest format version this reader understands.
pub const MAX_VERSION: u8 = 5;

/// Returns the format version declared by a versioned file, if the bytes start with one.
/// Classic files start with a non-zero song length and have no version byte.
pub(super) fn declared_version(input: &[u8]) -> Option<u8> {
    match input {
        [0, 0, version, ..] => Some(*version),
        _ => None,
    }
}

/// Parse an NBS string (signed 32-bit little-endian length prefix)
fn parse_string(input: &[u8]) -> IResult<&[u8], String> {
    let (input, len) = le_i32(input)?;
    let len = usize::try_from(len).map_err(|_| {
        nom::Err::Failure(nom::error::Error::new(input, nom::error::ErrorKind::Verify))
    })?;
    let (input, bytes) = take(len)(input)?;
    Ok((input, String::from_utf8_lossy(bytes).into_owned()))
}

/// Parse the song header. Fields the pipeline has no use for are skipped.
fn parse_header(input: &[u8]) -> IResult<&[u8], Header> {
    let (input, first) = le_u16(input)?;

    let (input, version) = if first == 0 {
        let (input, version) = le_u8(input)?;
        // Vanilla instrument count, then the song length from version 3.
        let (input, _) = take(if version >= 3 { 3usize } else { 1 })(input)?;
        (input, version)
    } else {
        // Classic files open with the song length instead.
        (input, 0)
    };

    let (input, layer_count) = le_u16(input)?;
    let (input, name) = parse_string(input)?;
    // Author, original author and description.
    let (input, _) = count(parse_string, 3)(input)?;
    // Tempo, auto-save flag, auto-save duration and time signature.
    let (input, _) = take(5usize)(input)?;
    // Minutes spent, left clicks, right clicks, blocks added, blocks removed.
    let (input, _) = take(20usize)(input)?;
    // Imported MIDI or schematic file name.
    let (input, _) = parse_string(input)?;
    // Loop flag, max loop count and loop start tick.
    let (input, _) = take(if version >= 4 { 4usize } else { 0 })(input)?;

    Ok((
        input,
        Header {
            version,
            layer_count,
            name,
        },
    ))
}

/// Walk the note block section and return the number of notes in it.
fn skip_notes(input: &[u8], version: u8) -> IResult<&[u8], usize> {
    // Instrument and key, then velocity, panning and fine pitch from version 4.
    let note_size: usize = if version >= 4 { 6 } else { 2 };
    let mut input = input;
    let mut notes = 0;

    loop {
        let (rest, tick_jump) = le_u16(input)?;
        input = rest;
        if tick_jump == 0 {
            break;
        }
        loop {
            let (rest, layer_jump) = le_u16(input)?;
            input = rest;
            if layer_jump == 0 {
                break;
            }
            let (rest, _) = take(note_size)(input)?;
            input = rest;
            notes += 1;
        }
    }

    Ok((input, notes))
}

/// Walk the layer section. Names, volumes and panning are not kept.
fn skip_layers(input: &[u8], layer_count: u16, version: u8) -> IResult<&[u8], ()> {
    // Lock flag from version 4, volume, then stereo panning from version 2.
    let trailer = 1 + usize::from(version >= 4) + usize::from(version >= 2);
    let (input, _) = count(pair(parse_string, take(trailer)), layer_count as usize)(input)?;
    Ok((input, ()))
}

fn parse_instruments(input: &[u8]) -> IResult<&[u8], Vec<CustomInstrument>> {
    let (mut input, instrument_count) = le_u8(input)?;
    let mut instruments = Vec::with_capacity(instrument_count as usize);

    for _ in 0..instrument_count {
        let (rest, name) = parse_string(input)?;
        let (rest, file) = parse_string(rest)?;
        // Key and the piano press flag.
        let (rest, _) = take(2usize)(rest)?;
        input = rest;
        instruments.push(CustomInstrument { name, file });
    }

    Ok((input, instruments))
}

/// Parse a full song file.
pub(super) fn parse_song(input: &[u8]) -> IResult<&[u8], Song> {
    let (input, header) = parse_header(input)?;
    let (input, note_count) = skip_notes(input, header.version)?;
    let (input, ()) = skip_layers(input, header.layer_count, header.version)?;
    let (input, instruments) = parse_instruments(input)?;

    Ok((
        input,
        Song {
            header,
            note_count,
            instruments,
        },
    ))
}
