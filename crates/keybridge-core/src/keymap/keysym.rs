//! The handful of X11 KeySyms the bridge needs to recognise.
//!
//! Values from `X11/keysymdef.h`.

/// `XK_BackSpace`.
pub const XK_BACKSPACE: u32 = 0xFF08;
/// `XK_Home`.
pub const XK_HOME: u32 = 0xFF50;
/// `XK_Left`.
pub const XK_LEFT: u32 = 0xFF51;
/// `XK_Up`.
pub const XK_UP: u32 = 0xFF52;
/// `XK_Right`.
pub const XK_RIGHT: u32 = 0xFF53;
/// `XK_Down`.
pub const XK_DOWN: u32 = 0xFF54;
/// `XK_Page_Up`.
pub const XK_PAGE_UP: u32 = 0xFF55;
/// `XK_Page_Down`.
pub const XK_PAGE_DOWN: u32 = 0xFF56;
/// `XK_End`.
pub const XK_END: u32 = 0xFF57;
/// `XK_KP_Home`.
pub const XK_KP_HOME: u32 = 0xFF95;
/// `XK_KP_Left`.
pub const XK_KP_LEFT: u32 = 0xFF96;
/// `XK_KP_Up`.
pub const XK_KP_UP: u32 = 0xFF97;
/// `XK_KP_Right`.
pub const XK_KP_RIGHT: u32 = 0xFF98;
/// `XK_KP_Down`.
pub const XK_KP_DOWN: u32 = 0xFF99;
/// `XK_KP_Page_Up`.
pub const XK_KP_PAGE_UP: u32 = 0xFF9A;
/// `XK_KP_Page_Down`.
pub const XK_KP_PAGE_DOWN: u32 = 0xFF9B;
/// `XK_KP_End`.
pub const XK_KP_END: u32 = 0xFF9C;

/// Returns `true` if `keysym` moves the caret without typing anything.
pub fn is_cursor_move(keysym: u32) -> bool {
    matches!(
        keysym,
        XK_HOME
            | XK_LEFT
            | XK_UP
            | XK_RIGHT
            | XK_DOWN
            | XK_PAGE_UP
            | XK_PAGE_DOWN
            | XK_END
            | XK_KP_HOME
            | XK_KP_LEFT
            | XK_KP_UP
            | XK_KP_RIGHT
            | XK_KP_DOWN
            | XK_KP_PAGE_UP
            | XK_KP_PAGE_DOWN
            | XK_KP_END
    )
}
