// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Default locations and environment variables used to configure a run.
//!
//! Instagram credentials are never compiled into the program. They have to
//! be passed on the command line or set in the environment under the names
//! below.

/// Default list of Instagram post shortcodes.
pub const INSTAGRAM_INPUT: &str = "instagram_urls.csv";

/// Default destination for Instagram comments.
pub const INSTAGRAM_OUTPUT: &str = "data/instagram/all_instagram_comments.csv";

/// Default list of TikTok video ids.
pub const TIKTOK_INPUT: &str = "urls.csv";

/// Default destination for TikTok comments.
pub const TIKTOK_OUTPUT: &str = "data/tiktok/all_comments.csv";

/// Holds the value of the Instagram `sessionid` cookie.
pub const SESSION_ID_ENV: &str = "INSTAGRAM_SESSION_ID";

/// Holds the value of the Instagram `ds_user_id` cookie.
pub const USER_ID_ENV: &str = "INSTAGRAM_USER_ID";

/// Holds the value of the Instagram `csrftoken` cookie.
pub const CSRF_TOKEN_ENV: &str = "INSTAGRAM_CSRF_TOKEN";

/// Holds the value of the Instagram `mid` (machine id) cookie.
pub const MACHINE_ID_ENV: &str = "INSTAGRAM_MID";
