//! Encoding profiles: the encode recipes offered by the server.
//!
//! A profile's `contentType` discriminator selects which detail variant
//! its embedded `profile` object carries. Shallow decoding (list views)
//! skips the detail block entirely; deep decoding (profile-set views)
//! populates exactly one variant of [`ProfileDetails`].

use serde::Serialize;
use serde_json::Value;

use crate::error::DecodeError;
use crate::json;
use crate::types::Key;

/// Content type accepted by the profile endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Video,
    Audio,
    Image,
}

impl ContentType {
    /// Lowercase wire form used in URL path segments and the
    /// `contentType` discriminator.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Video => "video",
            ContentType::Audio => "audio",
            ContentType::Image => "image",
        }
    }
}

/// One rung of the video rendition ladder. Ladder order is significant
/// and preserved from the server payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VideoBitRate {
    pub width: i32,
    pub height: i32,
    pub k_bit_rate: i32,
    /// Aspect-ratio policy: `decrease`, `increase`, or empty.
    pub force_original_aspect_ratio: String,
    pub pad: bool,
    pub k_max_rate: i32,
    pub k_buffer_size: i32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VideoDetails {
    pub codec: String,
    pub profile: String,
    pub two_passes: bool,
    pub other_output_parameters: String,
    pub frame_rate: i64,
    pub key_frame_interval_in_seconds: i64,
    pub bit_rates: Vec<VideoBitRate>,
    /// Audio track settings of a video profile.
    pub audio: AudioDetails,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AudioDetails {
    pub codec: String,
    pub other_output_parameters: String,
    pub channels_number: i32,
    pub sample_rate: i32,
    pub k_bit_rates: Vec<i32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImageDetails {
    pub width: i32,
    pub height: i32,
    pub aspect_ratio: bool,
    pub max_width: i32,
    pub max_height: i32,
    pub interlace_type: String,
}

/// Detail variant selected by the `contentType` discriminator.
///
/// `Unspecified` covers shallow decoding and unknown discriminators.
#[derive(Debug, Clone, Default, Serialize)]
pub enum ProfileDetails {
    Video(VideoDetails),
    Audio(AudioDetails),
    Image(ImageDetails),
    #[default]
    Unspecified,
}

/// One encode recipe.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EncodingProfile {
    pub encoding_profile_key: Key,
    pub global: bool,
    pub label: String,
    pub content_type: String,
    pub file_format: String,
    pub description: String,
    /// The raw recipe payload as transmitted, kept verbatim for callers
    /// that re-submit or display it.
    pub profile: Value,
    pub details: ProfileDetails,
}

impl EncodingProfile {
    const CONTEXT: &'static str = "EncodingProfile";

    /// Decode a profile. `deep` additionally decodes the detail variant
    /// selected by `contentType`; without it `details` stays
    /// [`ProfileDetails::Unspecified`].
    pub fn from_json(root: &Value, deep: bool) -> Result<Self, DecodeError> {
        let ctx = Self::CONTEXT;

        let mut profile = Self {
            encoding_profile_key: json::i64_field(root, ctx, "encodingProfileKey", -1)?,
            global: json::bool_field(root, ctx, "global", false)?,
            label: json::str_field(root, ctx, "label", "")?,
            content_type: json::str_field(root, ctx, "contentType", "")?,
            ..Self::default()
        };

        let recipe = match json::object(root, ctx, "profile")? {
            Some(recipe) => recipe.clone(),
            None => Value::Null,
        };
        profile.file_format = json::str_field(&recipe, ctx, "fileFormat", "")?;
        profile.description = json::str_field(&recipe, ctx, "description", "")?;

        if deep {
            profile.details = match profile.content_type.as_str() {
                "video" => ProfileDetails::Video(decode_video(&recipe)?),
                "audio" => ProfileDetails::Audio(decode_audio(&recipe)?),
                "image" => ProfileDetails::Image(decode_image(&recipe)?),
                _ => ProfileDetails::Unspecified,
            };
        }
        profile.profile = recipe;

        Ok(profile)
    }
}

fn decode_video(recipe: &Value) -> Result<VideoDetails, DecodeError> {
    let ctx = "VideoDetails";
    let video = match json::object(recipe, ctx, "video")? {
        Some(v) => v.clone(),
        None => Value::Null,
    };

    let mut bit_rates = Vec::new();
    for entry in json::array(&video, ctx, "bitRates")? {
        bit_rates.push(VideoBitRate {
            width: json::i32_field(entry, "VideoBitRate", "width", -1)?,
            height: json::i32_field(entry, "VideoBitRate", "height", -1)?,
            k_bit_rate: json::i32_field(entry, "VideoBitRate", "kBitRate", -1)?,
            force_original_aspect_ratio: json::str_field(
                entry,
                "VideoBitRate",
                "forceOriginalAspectRatio",
                "",
            )?,
            pad: json::bool_field(entry, "VideoBitRate", "pad", false)?,
            k_max_rate: json::i32_field(entry, "VideoBitRate", "kMaxRate", -1)?,
            k_buffer_size: json::i32_field(entry, "VideoBitRate", "kBufferSize", -1)?,
        });
    }

    Ok(VideoDetails {
        codec: json::str_field(&video, ctx, "codec", "")?,
        profile: json::str_field(&video, ctx, "profile", "")?,
        two_passes: json::bool_field(&video, ctx, "twoPasses", false)?,
        other_output_parameters: json::str_field(&video, ctx, "otherOutputParameters", "")?,
        frame_rate: json::i64_field(&video, ctx, "frameRate", -1)?,
        key_frame_interval_in_seconds: json::i64_field(
            &video,
            ctx,
            "keyFrameIntervalInSeconds",
            -1,
        )?,
        bit_rates,
        audio: decode_audio(recipe)?,
    })
}

fn decode_audio(recipe: &Value) -> Result<AudioDetails, DecodeError> {
    let ctx = "AudioDetails";
    let audio = match json::object(recipe, ctx, "audio")? {
        Some(a) => a.clone(),
        None => Value::Null,
    };

    let mut k_bit_rates = Vec::new();
    for entry in json::array(&audio, ctx, "bitRates")? {
        k_bit_rates.push(json::i32_field(entry, ctx, "kBitRate", -1)?);
    }

    Ok(AudioDetails {
        codec: json::str_field(&audio, ctx, "codec", "")?,
        other_output_parameters: json::str_field(&audio, ctx, "otherOutputParameters", "")?,
        channels_number: json::i32_field(&audio, ctx, "channelsNumber", -1)?,
        sample_rate: json::i32_field(&audio, ctx, "sampleRate", -1)?,
        k_bit_rates,
    })
}

fn decode_image(recipe: &Value) -> Result<ImageDetails, DecodeError> {
    let ctx = "ImageDetails";
    let image = match json::object(recipe, ctx, "image")? {
        Some(i) => i.clone(),
        None => Value::Null,
    };

    Ok(ImageDetails {
        width: json::i32_field(&image, ctx, "width", -1)?,
        height: json::i32_field(&image, ctx, "height", -1)?,
        aspect_ratio: json::bool_field(&image, ctx, "aspectRatio", false)?,
        max_width: json::i32_field(&image, ctx, "maxWidth", -1)?,
        max_height: json::i32_field(&image, ctx, "maxHeight", -1)?,
        interlace_type: json::str_field(&image, ctx, "interlaceType", "")?,
    })
}

/// Named, ordered group of encoding profiles.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EncodingProfilesSet {
    pub encoding_profiles_set_key: Key,
    pub label: String,
    pub content_type: String,
    /// Populated only on deep decoding.
    pub encoding_profiles: Vec<EncodingProfile>,
}

impl EncodingProfilesSet {
    const CONTEXT: &'static str = "EncodingProfilesSet";

    pub fn from_json(root: &Value, deep: bool) -> Result<Self, DecodeError> {
        let ctx = Self::CONTEXT;

        let mut set = Self {
            encoding_profiles_set_key: json::i64_field(root, ctx, "encodingProfilesSetKey", -1)?,
            label: json::str_field(root, ctx, "label", "")?,
            content_type: json::str_field(root, ctx, "contentType", "")?,
            encoding_profiles: Vec::new(),
        };

        if deep {
            for entry in json::array(root, ctx, "encodingProfiles")? {
                set.encoding_profiles
                    .push(EncodingProfile::from_json(entry, deep)?);
            }
        }

        Ok(set)
    }
}
