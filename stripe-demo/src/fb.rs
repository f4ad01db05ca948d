/// Linux framebuffer output: screen info via ioctl, mmap, RGBA to BGRA blit with a dirty check.

use std::fs::{File, OpenOptions};
use std::num::NonZeroUsize;
use std::os::unix::io::AsRawFd;
use std::ptr::NonNull;

use anyhow::{bail, Context, Result};
use nix::sys::mman::{mmap, munmap, MapFlags, ProtFlags};
use tiny_skia::Pixmap;

#[derive(Debug, Clone, Copy)]
pub struct ScreenInfo {
    pub width: u32,
    pub height: u32,
    /// Bytes per line.
    pub stride: u32,
    pub bits_per_pixel: u32,
}

#[repr(C)]
#[derive(Default)]
struct FbBitfield {
    offset: u32,
    length: u32,
    msb_right: u32,
}

/// `struct fb_var_screeninfo`
#[repr(C)]
#[derive(Default)]
struct FbVarScreenInfo {
    xres: u32,
    yres: u32,
    xres_virtual: u32,
    yres_virtual: u32,
    xoffset: u32,
    yoffset: u32,
    bits_per_pixel: u32,
    grayscale: u32,
    red: FbBitfield,
    green: FbBitfield,
    blue: FbBitfield,
    transp: FbBitfield,
    nonstd: u32,
    activate: u32,
    height: u32,
    width: u32,
    accel_flags: u32,
    pixclock: u32,
    left_margin: u32,
    right_margin: u32,
    upper_margin: u32,
    lower_margin: u32,
    hsync_len: u32,
    vsync_len: u32,
    sync: u32,
    vmode: u32,
    rotate: u32,
    colorspace: u32,
    reserved: [u32; 4],
}

/// `struct fb_fix_screeninfo`
#[repr(C)]
#[derive(Default)]
struct FbFixScreenInfo {
    id: [u8; 16],
    smem_start: libc::c_ulong,
    smem_len: u32,
    fb_type: u32,
    type_aux: u32,
    visual: u32,
    xpanstep: u16,
    ypanstep: u16,
    ywrapstep: u16,
    line_length: u32,
    mmio_start: libc::c_ulong,
    mmio_len: u32,
    accel: u32,
    capabilities: u16,
    reserved: [u16; 2],
}

nix::ioctl_read_bad!(fbioget_vscreeninfo, 0x4600, FbVarScreenInfo);
nix::ioctl_read_bad!(fbioget_fscreeninfo, 0x4602, FbFixScreenInfo);

pub struct Framebuffer {
    _file: File,
    map: NonNull<libc::c_void>,
    len: usize,
    info: ScreenInfo,
    last_frame: Vec<u8>,
}

impl Framebuffer {
    pub fn open(path: &str) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .with_context(|| format!("failed to open {path}"))?;
        let fd = file.as_raw_fd();

        let mut vinfo = FbVarScreenInfo::default();
        let mut finfo = FbFixScreenInfo::default();
        unsafe {
            fbioget_vscreeninfo(fd, &mut vinfo).context("FBIOGET_VSCREENINFO")?;
            fbioget_fscreeninfo(fd, &mut finfo).context("FBIOGET_FSCREENINFO")?;
        }

        let info = ScreenInfo {
            width: vinfo.xres,
            height: vinfo.yres,
            stride: finfo.line_length,
            bits_per_pixel: vinfo.bits_per_pixel,
        };
        if info.bits_per_pixel != 32 {
            bail!("{path}: only 32 bpp framebuffers are supported, got {}", info.bits_per_pixel);
        }

        let len = info.stride as usize * info.height as usize;
        let map = unsafe {
            mmap(
                None,
                NonZeroUsize::new(len).context("framebuffer has zero size")?,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_SHARED,
                &file,
                0,
            )
        }
        .context("mmap framebuffer")?;

        tracing::info!(
            path,
            width = info.width,
            height = info.height,
            stride = info.stride,
            "framebuffer opened"
        );

        Ok(Self {
            _file: file,
            map,
            len,
            info,
            last_frame: Vec::new(),
        })
    }

    pub fn info(&self) -> ScreenInfo {
        self.info
    }

    /// Copy `frame` to the screen, swapping red and blue. Identical frames are skipped.
    pub fn present(&mut self, frame: &Pixmap) {
        let src = frame.data();
        if self.last_frame == src {
            return;
        }

        let dst = unsafe { std::slice::from_raw_parts_mut(self.map.as_ptr().cast::<u8>(), self.len) };
        let row_bytes = (frame.width().min(self.info.width) * 4) as usize;
        let src_stride = frame.width() as usize * 4;
        let rows = frame.height().min(self.info.height) as usize;
        for (src_row, dst_row) in src
            .chunks_exact(src_stride)
            .zip(dst.chunks_mut(self.info.stride as usize))
            .take(rows)
        {
            for (s, d) in src_row[..row_bytes]
                .chunks_exact(4)
                .zip(dst_row[..row_bytes].chunks_exact_mut(4))
            {
                d.copy_from_slice(&[s[2], s[1], s[0], s[3]]);
            }
        }

        self.last_frame.clear();
        self.last_frame.extend_from_slice(src);
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        if let Err(err) = unsafe { munmap(self.map, self.len) } {
            tracing::warn!(%err, "munmap framebuffer");
        }
    }
}
