//! Discovery document served at `/.well-known/farcaster.json`

use crate::config::Config;
use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub account_association: AccountAssociation,
    pub frame: FrameDescriptor,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountAssociation {
    pub header: String,
    pub payload: String,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDescriptor {
    pub name: String,
    pub version: String,
    pub icon_url: Url,
    pub home_url: String,
    pub image_url: Url,
    pub splash_image_url: Url,
    pub splash_background_color: String,
    pub webhook_url: Url,
    pub subtitle: String,
    pub description: String,
    pub primary_category: String,
}

/// Build the document, resolving every path against `app.public_url`
pub fn build(config: &Config) -> Result<Manifest, url::ParseError> {
    let app = &config.app;
    let association = &config.manifest.account_association;
    let frame = &config.manifest.frame;

    Ok(Manifest {
        account_association: AccountAssociation {
            header: association.header.clone(),
            payload: association.payload.clone(),
            signature: association.signature.clone(),
        },
        frame: FrameDescriptor {
            name: frame.name.clone(),
            version: frame.version.clone(),
            icon_url: app.link(&frame.icon_path)?,
            home_url: app.home_url(),
            image_url: app.link(&frame.image_path)?,
            splash_image_url: app.link(&frame.splash_image_path)?,
            splash_background_color: frame.splash_background_color.clone(),
            webhook_url: app.link(&frame.webhook_path)?,
            subtitle: frame.subtitle.clone(),
            description: frame.description.clone(),
            primary_category: frame.primary_category.clone(),
        },
    })
}
