//! embedded_hal I2C trait implementations for the bridge.
use embedded_hal::i2c::{self, I2c, Operation, SevenBitAddress};
use nusb::transfer::TransferError;

use super::EvalBoard;
use crate::Error;
use crate::poll::Clock;
use crate::transport::{ControlTransport, VendorRequest, slave_address_index};

impl i2c::Error for Error {
    fn kind(&self) -> i2c::ErrorKind {
        use i2c::NoAcknowledgeSource::Unknown;
        // The firmware stalls the control pipe when the I2C target does not
        // acknowledge, without saying whether it was the address or data.
        match self {
            Error::Transport(TransferError::Stall) => i2c::ErrorKind::NoAcknowledge(Unknown),
            _ => i2c::ErrorKind::Other,
        }
    }
}

impl<T, C> i2c::ErrorType for EvalBoard<T, C> {
    type Error = Error;
}

/// Helper to chunk operations based on type (enum case).
fn same_operation_type(a: &Operation, b: &Operation) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

type MaybeOps<'a, 'b, 'c> = Option<&'a mut &'b mut [Operation<'c>]>;
type WritesReads<'a, 'b, 'c> = (MaybeOps<'a, 'b, 'c>, MaybeOps<'a, 'b, 'c>);

/// Split chunked operations into at most one run of writes followed by one run of
/// reads.
fn try_get_valid_operations<'a, 'b, 'c>(
    ops: &'a mut [&'b mut [Operation<'c>]],
) -> Result<WritesReads<'a, 'b, 'c>, Error> {
    match ops {
        [] => Ok((None, None)),
        [_, _, _, ..] => Err(Error::UnsupportedI2cTransaction),
        [[Operation::Read(_), ..], [Operation::Write(_), ..]] => {
            Err(Error::UnsupportedI2cTransaction)
        }
        [
            writes @ [Operation::Write(_), ..],
            reads @ [Operation::Read(_), ..],
        ] => Ok((Some(writes), Some(reads))),
        [reads @ [Operation::Read(_), ..]] => Ok((None, Some(reads))),
        [writes @ [Operation::Write(_), ..]] => Ok((Some(writes), None)),
        _ => unreachable!(),
    }
}

/// Concatenate the buffers of a run of writes.
fn gather_writes(writes: &[Operation<'_>]) -> Vec<u8> {
    let mut data = Vec::new();
    for op in writes {
        let Operation::Write(buf) = op else {
            unreachable!("Chunk checks ensure only writes here.")
        };
        data.extend_from_slice(buf);
    }
    data
}

/// Copy `data` across the buffers of a run of reads.
fn scatter_reads(reads: &mut [Operation<'_>], data: &[u8]) {
    let mut copied_so_far = 0;
    for op in reads.iter_mut() {
        let Operation::Read(their_buffer) = op else {
            unreachable!("Chunk checks ensure only reads here.");
        };
        let end = copied_so_far + their_buffer.len();
        their_buffer.copy_from_slice(&data[copied_so_far..end]);
        copied_so_far = end;
    }
}

fn read_length(reads: &[Operation<'_>]) -> usize {
    reads
        .iter()
        .map(|op| match op {
            Operation::Read(items) => items.len(),
            Operation::Write(items) => items.len(),
        })
        .sum()
}

impl<T: ControlTransport, C: Clock> I2c<SevenBitAddress> for EvalBoard<T, C> {
    /// Execute the provided operations on the I2C bus.
    ///
    /// <div class="warning">
    ///
    /// The bridge firmware only knows three transaction shapes: a plain read, a
    /// plain write, and a write of a one- or two-byte register index followed by a
    /// repeated-start read. Consecutive operations of the same kind are merged, and
    /// anything that does not then fit one of those shapes returns
    /// [`Error::UnsupportedI2cTransaction`].
    ///
    /// </div>
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut chunked: Vec<&mut [Operation<'_>]> =
            operations.chunk_by_mut(same_operation_type).collect();
        let (writes, reads) = try_get_valid_operations(chunked.as_mut_slice())?;

        match (writes, reads) {
            (None, None) => Ok(()),
            (Some(writes), None) => self.write(address, &gather_writes(writes)),
            (None, Some(reads)) => {
                let mut data = vec![0u8; read_length(reads)];
                self.read(address, &mut data)?;
                scatter_reads(reads, &data);
                Ok(())
            }
            (Some(writes), Some(reads)) => {
                let index = gather_writes(writes);
                let mut data = vec![0u8; read_length(reads)];
                self.write_read(address, &index, &mut data)?;
                scatter_reads(reads, &data);
                Ok(())
            }
        }
    }

    fn read(&mut self, address: SevenBitAddress, read: &mut [u8]) -> Result<(), Self::Error> {
        self.vendor_read(VendorRequest::I2c, slave_address_index(address), 0, read)
    }

    fn write(&mut self, address: SevenBitAddress, write: &[u8]) -> Result<(), Self::Error> {
        self.vendor_write(VendorRequest::I2c, slave_address_index(address), 0, write)
    }

    /// Write a register index, then read.
    ///
    /// `write` must be one byte (8-bit register index) or two bytes (16-bit index,
    /// most significant byte first).
    fn write_read(
        &mut self,
        address: SevenBitAddress,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), Self::Error> {
        let (request, value) = match *write {
            [index] => (VendorRequest::I2cIndexed8, u16::from(index)),
            [high, low] => (VendorRequest::I2cIndexed16, u16::from_be_bytes([high, low])),
            _ => return Err(Error::UnsupportedI2cTransaction),
        };
        self.vendor_read(request, slave_address_index(address), value, read)
    }
}

#[cfg(feature = "async")]
mod eh_async {
    use embedded_hal::i2c::{I2c as BlockingI2c, Operation};
    use embedded_hal_async::i2c::I2c as AsyncI2c;

    use crate::EvalBoard;
    use crate::poll::Clock;
    use crate::transport::ControlTransport;

    impl<T: ControlTransport, C: Clock> AsyncI2c for EvalBoard<T, C> {
        async fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            BlockingI2c::transaction(self, address, operations)
        }

        async fn read(&mut self, address: u8, read: &mut [u8]) -> Result<(), Self::Error> {
            BlockingI2c::read(self, address, read)
        }

        async fn write(&mut self, address: u8, write: &[u8]) -> Result<(), Self::Error> {
            BlockingI2c::write(self, address, write)
        }

        async fn write_read(
            &mut self,
            address: u8,
            write: &[u8],
            read: &mut [u8],
        ) -> Result<(), Self::Error> {
            BlockingI2c::write_read(self, address, write, read)
        }
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal::i2c::{Error as _, ErrorKind, I2c, NoAcknowledgeSource, Operation};

    use super::*;
    use crate::driver::tests::board;

    #[test]
    fn plain_read_and_write_use_simple_request() {
        let mut board = board();
        board.transport.respond(&[0x12, 0x34]);
        let mut buf = [0u8; 2];
        board.read(0x44, &mut buf).unwrap();
        board.write(0x44, &[0xFD]).unwrap();
        assert_eq!(buf, [0x12, 0x34]);
        let calls = board.transport.calls.borrow();
        assert!(calls.iter().all(|c| c.request == VendorRequest::I2c));
        assert!(calls.iter().all(|c| c.index == 0x88 && c.value == 0));
        assert_eq!(calls[1].data, [0xFD]);
    }

    #[test]
    fn write_read_selects_index_width() {
        let mut board = board();
        board.transport.respond(&[0xAA]);
        board.transport.respond(&[0xBB]);
        let mut buf = [0u8; 1];
        board.write_read(0x48, &[0x07], &mut buf).unwrap();
        board.write_read(0x50, &[0x01, 0x02], &mut buf).unwrap();
        let calls = board.transport.calls.borrow();
        assert_eq!(calls[0].request, VendorRequest::I2cIndexed8);
        assert_eq!((calls[0].index, calls[0].value), (0x90, 0x07));
        assert_eq!(calls[1].request, VendorRequest::I2cIndexed16);
        assert_eq!((calls[1].index, calls[1].value), (0xA0, 0x0102));
    }

    #[test]
    fn write_read_rejects_long_index() {
        let mut board = board();
        let mut buf = [0u8; 1];
        assert!(matches!(
            board.write_read(0x48, &[1, 2, 3], &mut buf),
            Err(Error::UnsupportedI2cTransaction)
        ));
        assert!(board.transport.calls.borrow().is_empty());
    }

    #[test]
    fn transaction_coalesces_operations() {
        let mut board = board();
        board.transport.respond(&[1, 2, 3, 4, 5, 6]);
        let mut cap = [0u8; 3];
        let mut vt = [0u8; 3];
        board
            .transaction(
                0x48,
                &mut [
                    Operation::Write(&[0x01]),
                    Operation::Read(&mut cap),
                    Operation::Read(&mut vt),
                ],
            )
            .unwrap();
        assert_eq!(cap, [1, 2, 3]);
        assert_eq!(vt, [4, 5, 6]);
        let calls = board.transport.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].data.len(), 6);
    }

    #[test]
    fn transaction_rejects_read_before_write() {
        let mut board = board();
        let mut buf = [0u8; 1];
        let result = board.transaction(
            0x48,
            &mut [Operation::Read(&mut buf), Operation::Write(&[0x00])],
        );
        assert!(matches!(result, Err(Error::UnsupportedI2cTransaction)));
        assert!(board.transport.calls.borrow().is_empty());
    }

    #[test]
    fn empty_transaction_is_a_no_op() {
        let mut board = board();
        board.transaction(0x48, &mut []).unwrap();
        assert!(board.transport.calls.borrow().is_empty());
    }

    #[test]
    fn stall_is_a_nack() {
        assert_eq!(
            Error::Transport(TransferError::Stall).kind(),
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown)
        );
        assert_eq!(Error::TransferLength(0).kind(), ErrorKind::Other);
    }
}
