// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::sync::Arc;

/// Both raw-handle traits in one, so it can be used as a trait object.
pub trait WindowHandle: HasWindowHandle + HasDisplayHandle {}

impl<T: HasWindowHandle + HasDisplayHandle> WindowHandle for T {}

/// A shareable handle the renderer keeps alive for as long as its surface.
pub type PalestraWindowHandle = Arc<dyn WindowHandle + Send + Sync>;

/// The window the demo draws into.
pub trait PalestraWindow: HasWindowHandle + HasDisplayHandle + Send + Sync {
    /// Physical size of the drawable area, in pixels.
    fn inner_size(&self) -> (u32, u32);

    /// Requests that the window be redrawn.
    fn request_redraw(&self);

    /// Clones a handle suitable for surface creation.
    fn clone_handle_arc(&self) -> PalestraWindowHandle;
}
