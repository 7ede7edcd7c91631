/// Commands the owning view sends into a running room session.
#[derive(Debug)]
pub enum SessionCommand {
    /// Flip audio enablement on the captured local tracks. Local-only; never
    /// renegotiates.
    ToggleMute,

    /// Flip video enablement on the captured local tracks.
    ToggleVideo,

    /// Leave the room: stop local capture, close every peer transport, exit.
    Leave,
}
