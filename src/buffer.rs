use std::{
    ffi::CStr,
    fs::File,
    io,
    os::unix::io::{AsFd, FromRawFd},
};

use memmap::{MmapMut, MmapOptions};
use nix::sys::memfd::{memfd_create, MemFdCreateFlag};
use wayland_client::{
    protocol::{wl_buffer, wl_shm, wl_shm_pool},
    Dispatch, QueueHandle,
};

use crate::color::Color;
use crate::error::Result;
use crate::layout::Geometry;

const MAX_BUFFERS: usize = 2;

/// Creates an anonymous, sealable file of `size` bytes.
pub fn memfd(name: &CStr, size: u64) -> Result<File> {
    let fd = memfd_create(
        name,
        MemFdCreateFlag::MFD_CLOEXEC | MemFdCreateFlag::MFD_ALLOW_SEALING,
    )?;
    // memfd_create hands us a fresh descriptor nobody else owns.
    let file = unsafe { File::from_raw_fd(fd) };
    file.set_len(size)?;
    Ok(file)
}

pub struct Buffer {
    pub buffer: wl_buffer::WlBuffer,
    pub mmap: MmapMut,
    pub dimensions: (u32, u32),
    acquired: bool,
    _file: File,
}

impl Buffer {
    fn new<D>(shm: &wl_shm::WlShm, dimensions: (u32, u32), qh: &QueueHandle<D>) -> Result<Buffer>
    where
        D: Dispatch<wl_shm_pool::WlShmPool, ()> + Dispatch<wl_buffer::WlBuffer, ()> + 'static,
    {
        let stride = dimensions.0 * 4;
        let size = stride * dimensions.1;
        let name = CStr::from_bytes_with_nul(b"wlkbd-shm\0")
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let file = memfd(name, size as u64)?;
        let mmap = unsafe { MmapOptions::new().len(size as usize).map_mut(&file)? };

        let pool = shm.create_pool(file.as_fd(), size as i32, qh, ());
        let buffer = pool.create_buffer(
            0,
            dimensions.0 as i32,
            dimensions.1 as i32,
            stride as i32,
            wl_shm::Format::Argb8888,
            qh,
            (),
        );
        pool.destroy();

        Ok(Buffer {
            buffer,
            mmap,
            dimensions,
            acquired: false,
            _file: file,
        })
    }

    pub fn acquire(&mut self) {
        self.acquired = true;
    }

    pub fn release(&mut self) {
        self.acquired = false;
    }

    /// Copies the given rectangle of `canvas` into the buffer.
    pub fn copy_from(&mut self, canvas: &[u32], damage: Geometry) {
        let width = self.dimensions.0 as usize;
        let x0 = damage.x as usize;
        let x1 = (damage.x + damage.width).min(self.dimensions.0) as usize;
        let y1 = (damage.y + damage.height).min(self.dimensions.1) as usize;
        for y in damage.y as usize..y1 {
            let row = &canvas[y * width + x0..y * width + x1];
            let bytes = &mut self.mmap[(y * width + x0) * 4..(y * width + x1) * 4];
            for (dst, px) in bytes.chunks_exact_mut(4).zip(row) {
                dst.copy_from_slice(&px.to_le_bytes());
            }
        }
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.buffer.destroy();
    }
}

/// A small pool of shm buffers. A buffer stays acquired from attach until
/// the compositor releases it.
#[derive(Default)]
pub struct BufferManager {
    pub buffers: Vec<Buffer>,
}

impl BufferManager {
    pub fn new() -> BufferManager {
        BufferManager {
            buffers: Vec::new(),
        }
    }

    /// Returns a free buffer of the requested size, allocating one if fewer
    /// than two exist. `None` means every buffer is still held by the
    /// compositor.
    pub fn next_buffer<D>(
        &mut self,
        shm: &wl_shm::WlShm,
        dimensions: (u32, u32),
        qh: &QueueHandle<D>,
    ) -> Result<Option<&mut Buffer>>
    where
        D: Dispatch<wl_shm_pool::WlShmPool, ()> + Dispatch<wl_buffer::WlBuffer, ()> + 'static,
    {
        self.buffers.retain(|b| b.acquired || b.dimensions == dimensions);
        let idx = match self
            .buffers
            .iter()
            .position(|b| !b.acquired && b.dimensions == dimensions)
        {
            Some(idx) => idx,
            None if self.buffers.len() < MAX_BUFFERS => {
                log::debug!("allocating {}x{} buffer", dimensions.0, dimensions.1);
                self.buffers.push(Buffer::new(shm, dimensions, qh)?);
                self.buffers.len() - 1
            }
            None => return Ok(None),
        };
        Ok(self.buffers.get_mut(idx))
    }

    pub fn release(&mut self, buffer: &wl_buffer::WlBuffer) {
        for buf in self.buffers.iter_mut() {
            if &buf.buffer == buffer {
                buf.release();
            }
        }
    }

    pub fn clear_buffers(&mut self) {
        self.buffers.clear();
    }
}

/// A view into a row-major ARGB8888 pixel slice, optionally clipped to a
/// sub-rectangle. Coordinates passed to `put` are relative to the clip.
pub struct BufferView<'a> {
    buf: &'a mut [u32],
    dimensions: (u32, u32),
    clip: Geometry,
}

impl<'a> BufferView<'a> {
    pub fn new(buf: &'a mut [u32], dimensions: (u32, u32)) -> BufferView<'a> {
        BufferView {
            buf,
            dimensions,
            clip: Geometry {
                x: 0,
                y: 0,
                width: dimensions.0,
                height: dimensions.1,
            },
        }
    }

    pub fn get_bounds(&self) -> Geometry {
        self.clip
    }

    pub fn subgeometry(&mut self, geo: Geometry) -> Result<BufferView, io::Error> {
        let bounds = self.clip;
        if geo.x + geo.width > bounds.width || geo.y + geo.height > bounds.height {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!(
                    "cannot create subgeometry larger than buffer: {:?} > {:?}",
                    geo, bounds
                ),
            ));
        }

        Ok(BufferView {
            buf: &mut *self.buf,
            dimensions: self.dimensions,
            clip: Geometry {
                x: bounds.x + geo.x,
                y: bounds.y + geo.y,
                width: geo.width,
                height: geo.height,
            },
        })
    }

    pub fn memset(&mut self, c: Color) {
        let clip = self.clip;
        let width = self.dimensions.0;
        for y in clip.y..clip.y + clip.height {
            let start = (clip.x + y * width) as usize;
            self.buf[start..start + clip.width as usize].fill(c.0);
        }
    }

    fn index(&self, pos: (u32, u32)) -> Option<usize> {
        if pos.0 >= self.clip.width || pos.1 >= self.clip.height {
            return None;
        }
        Some(((pos.0 + self.clip.x) + (pos.1 + self.clip.y) * self.dimensions.0) as usize)
    }

    pub fn get(&self, pos: (u32, u32)) -> Option<Color> {
        self.index(pos).map(|i| Color(self.buf[i]))
    }

    pub fn put(&mut self, pos: (u32, u32), c: Color) -> Result<(), io::Error> {
        match self.index(pos) {
            Some(i) => {
                self.buf[i] = c.0;
                Ok(())
            }
            None => Err(io::Error::new(
                io::ErrorKind::Other,
                format!(
                    "put({:?}) is not within subgeometry of buffer ({:?})",
                    pos, self.clip
                ),
            )),
        }
    }
}
