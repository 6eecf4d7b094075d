use nmea_traits::{ByteSource, Clock};

use crate::command::{frame_command, Ack, AckWait};
use crate::consts::{DEFAULT_ACK_TIMEOUT_MS, DEFAULT_BUFFER_SIZE};
use crate::error::GpsError;
use crate::fix::{Fix, FixState};
use crate::frame::{printable, Frame, FrameExtractor};
use crate::sentence::Sentence;
use crate::timezone::{LocalTime, TimezoneRule};

#[derive(Debug, Clone, Copy)]
pub struct Config<'a> {
    /// Checked in order, first rule that started before the fix wins
    pub timezone: Option<&'a [TimezoneRule<'a>]>,
    /// Trace every sentence received and sent
    pub debug: bool,
    /// Used by [`Gps::send_and_wait`]
    pub ack_timeout_ms: u64,
}

impl Default for Config<'_> {
    fn default() -> Self {
        Self {
            timezone: None,
            debug: false,
            ack_timeout_ms: DEFAULT_ACK_TIMEOUT_MS,
        }
    }
}

/// NMEA receiver on a serial link.
///
/// Nothing happens in the background: call [`Gps::update`] often enough to
/// keep up with the receiver, then read the fix through the accessors.
pub struct Gps<'a, S, C, const N: usize = DEFAULT_BUFFER_SIZE>
where
    S: ByteSource,
    C: Clock,
{
    source: S,
    clock: C,
    config: Config<'a>,
    frames: FrameExtractor<N>,
    fix: FixState<N>,
    last: Option<Frame<N>>,
}

impl<'a, S, C> Gps<'a, S, C>
where
    S: ByteSource,
    C: Clock,
{
    pub fn new(source: S, clock: C, config: Config<'a>) -> Self {
        Self::with_buffer(source, clock, config)
    }
}

impl<'a, S, C, const N: usize> Gps<'a, S, C, N>
where
    S: ByteSource,
    C: Clock,
{
    /// Same as [`Gps::new`] with an `N` byte sentence buffer
    pub fn with_buffer(source: S, clock: C, config: Config<'a>) -> Self {
        Self {
            source,
            clock,
            frames: FrameExtractor::new().with_debug(config.debug),
            config,
            fix: FixState::default(),
            last: None,
        }
    }

    /// Process at most one sentence from the receiver.
    /// Returns:
    /// * Some(sentence) if a valid sentence was received; GGA and RMC have been applied to the fix
    /// * None if no complete sentence is available yet, or it failed validation
    ///
    /// The sentence borrows the receiver, drop it before calling anything
    /// else on `Gps`. [`Gps::last_sentence`] gives it back later.
    pub fn update(&mut self) -> Option<Sentence<'_>> {
        let now = self.clock.now_ms();
        let frame = self.frames.poll(&mut self.source, now)?;
        if self.config.debug {
            log::debug!("< {}", printable(frame.as_bytes()));
        }

        if !Sentence::is_valid(frame.as_bytes()) {
            if self.config.debug {
                log::debug!("rejected {}", printable(frame.as_bytes()));
            }
            return None;
        }

        let frame = self.last.insert(frame);
        let sentence = Sentence::split(frame.as_bytes());
        self.fix.apply(&sentence, frame.received);
        Some(sentence)
    }

    /// Last valid sentence of any type
    pub fn last_sentence(&self) -> Option<Sentence<'_>> {
        self.last
            .as_ref()
            .and_then(|frame| Sentence::validate(frame.as_bytes()))
    }

    /// Send `$<payload>*<CS>\r\n` to the receiver.
    ///
    /// Unread input is thrown away first so an old acknowledgment cannot be
    /// mistaken for the answer to this command.
    /// Returns:
    /// * Ok(None) without `wait`
    /// * Ok(Some(ack)) with `wait`, once a PMTK001 sentence arrived
    pub fn send_command(
        &mut self,
        payload: &[u8],
        wait: Option<AckWait<'_>>,
    ) -> Result<Option<Ack>, GpsError> {
        let command = frame_command(payload)?;

        self.source.discard_input();
        self.frames.clear();
        if self.config.debug {
            log::debug!("> {}", printable(&command[..command.len() - 2]));
        }
        self.source.write(&command)?;

        match wait {
            Some(wait) => self.wait_for_ack(wait).map(Some),
            None => Ok(None),
        }
    }

    /// [`Gps::send_command`] waiting up to the configured acknowledgment timeout
    pub fn send_and_wait(&mut self, payload: &[u8]) -> Result<Ack, GpsError> {
        self.send_command(payload, None)?;
        self.wait_for_ack(AckWait::new(self.config.ack_timeout_ms))
    }

    /// Keep polling until a PMTK001 sentence arrives, the deadline passes or
    /// the cancellation flag is raised. Other sentences are applied as usual.
    pub fn wait_for_ack(&mut self, wait: AckWait<'_>) -> Result<Ack, GpsError> {
        let deadline = self.clock.now_ms().saturating_add(wait.timeout_ms);
        loop {
            if wait.is_cancelled() {
                log::debug!("acknowledgment wait cancelled");
                return Err(GpsError::Cancelled);
            }
            if let Some(ack) = self.update().as_ref().and_then(Ack::from_sentence) {
                return Ok(ack);
            }
            if self.clock.now_ms() >= deadline {
                log::warn!("no acknowledgment within {} ms", wait.timeout_ms);
                return Err(GpsError::Timeout);
            }
            core::hint::spin_loop();
        }
    }

    /// Read and clear the completeness flag: true once for every GGA/RMC pair with equal times
    pub fn complete(&mut self) -> bool {
        self.fix.take_complete()
    }

    /// Decoded fix, once per completed GGA/RMC pair
    pub fn take_fix(&mut self) -> Option<Fix> {
        self.fix.take_fix()
    }

    pub fn fix_state(&self) -> &FixState<N> {
        &self.fix
    }

    pub fn fix(&self) -> u8 {
        self.fix.fix()
    }

    pub fn date(&self) -> u32 {
        self.fix.date()
    }

    pub fn time(&self) -> f64 {
        self.fix.time()
    }

    pub fn datetime(&self) -> Option<LocalTime<'a>> {
        self.fix.datetime(self.config.timezone.unwrap_or(&[]))
    }

    pub fn latitude(&self) -> Option<f64> {
        self.fix.latitude()
    }

    pub fn longitude(&self) -> Option<f64> {
        self.fix.longitude()
    }

    pub fn speed(&self) -> Option<f64> {
        self.fix.speed()
    }

    pub fn heading(&self) -> Option<f64> {
        self.fix.heading()
    }

    /// Arrival time of the last GGA (ms)
    pub fn received(&self) -> u64 {
        self.fix.received()
    }

    pub fn config(&self) -> &Config<'a> {
        &self.config
    }

    /// Direct access to the link, e.g. for vendor specific setup
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_parts(self) -> (S, C) {
        (self.source, self.clock)
    }
}
