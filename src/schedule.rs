use crate::error::ScheduleError;

/// Channel and kernel progression of a [`VoxelNetwork`](crate::classifier::VoxelNetwork).
///
/// Entry `i` holds the channel count of the activation after layer `i` (entry `0` is the input)
/// and the edge of the cubic kernel used by the transition `i - 1 → i`.
///
/// Example: channels = 1, conv = [8, 8], fc = [4], classes = 3:
/// channels [1, 8, 8, 4, 3], kernels [3, 3, 3, 1, 1]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "UncheckedLayerSchedule")]
pub struct LayerSchedule {
    channels: Vec<usize>,
    kernels: Vec<usize>,
}

#[derive(serde::Deserialize)]
struct UncheckedLayerSchedule {
    channels: Vec<usize>,
    kernels: Vec<usize>,
}

impl TryFrom<UncheckedLayerSchedule> for LayerSchedule {
    type Error = ScheduleError;

    fn try_from(unchecked: UncheckedLayerSchedule) -> Result<Self, Self::Error> {
        Self::from_parts(unchecked.channels, unchecked.kernels)
    }
}

/// One `i - 1 → i` step of a [`LayerSchedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Index of the produced activation, starting at 1.
    pub index: usize,
    pub in_channels: usize,
    pub out_channels: usize,
    pub kernel_size: usize,
    /// The last transition produces logits and has no activation.
    pub is_last: bool,
}

impl LayerSchedule {
    /// Kernel edge of the spatial convolution layers.
    pub const CONV_KERNEL: usize = 3;
    /// Kernel edge of the per-voxel ("fully connected") layers.
    pub const FC_KERNEL: usize = 1;

    pub fn new(
        input_channels: usize,
        conv_layers: &[usize],
        fc_layers: &[usize],
        num_classes: usize,
    ) -> Self {
        let mut channels = Vec::with_capacity(2 + conv_layers.len() + fc_layers.len());
        channels.push(input_channels);
        channels.extend_from_slice(conv_layers);
        channels.extend_from_slice(fc_layers);
        channels.push(num_classes);

        let mut kernels = vec![Self::CONV_KERNEL; conv_layers.len() + 1];
        kernels.extend(std::iter::repeat_n(Self::FC_KERNEL, fc_layers.len() + 1));

        debug_assert_eq!(channels.len(), kernels.len());
        Self { channels, kernels }
    }

    /// Builds a schedule from explicit lists.
    ///
    /// Both lists must have the same length of at least 2, every channel count must be positive
    /// and every kernel edge odd.
    pub fn from_parts(channels: Vec<usize>, kernels: Vec<usize>) -> Result<Self, ScheduleError> {
        if channels.len() != kernels.len() {
            return Err(ScheduleError::LengthMismatch {
                channels: channels.len(),
                kernels: kernels.len(),
            });
        }
        if channels.len() < 2 {
            return Err(ScheduleError::TooShort(channels.len()));
        }
        if let Some(index) = channels.iter().position(|c| *c == 0) {
            return Err(ScheduleError::ZeroChannels(index));
        }
        if let Some((index, kernel)) = kernels.iter().enumerate().find(|(_, k)| *k % 2 == 0) {
            return Err(ScheduleError::EvenKernel {
                index,
                kernel: *kernel,
            });
        }
        Ok(Self { channels, kernels })
    }

    pub fn channels(&self) -> &[usize] {
        &self.channels
    }

    pub fn kernels(&self) -> &[usize] {
        &self.kernels
    }

    /// Number of schedule entries, including the input.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of learnable layers.
    pub fn num_layers(&self) -> usize {
        self.len().saturating_sub(1)
    }

    pub fn input_channels(&self) -> usize {
        self.channels[0]
    }

    pub fn num_classes(&self) -> usize {
        self.channels[self.len() - 1]
    }

    pub fn transitions(&self) -> impl Iterator<Item = Transition> + '_ {
        let last = self.num_layers();
        (1..self.len()).map(move |i| Transition {
            index: i,
            in_channels: self.channels[i - 1],
            out_channels: self.channels[i],
            kernel_size: self.kernels[i],
            is_last: i == last,
        })
    }
}
