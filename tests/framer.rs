use anyhow::Result;
use ieee80211b::Preamble;
use ieee80211b::Rate;
use ieee80211b::blocks::Framer;
use ieee80211b::plcp::PlcpHeader;
use ieee80211b::plcp::crc16;
use ieee80211b::runtime::Error;
use ieee80211b::runtime::ItemTag;
use ieee80211b::runtime::Mocker;
use ieee80211b::runtime::Tag;
use std::thread;

fn tag(index: usize, tag: Tag) -> ItemTag {
    ItemTag { index, tag }
}

#[test]
fn short_preamble_at_1mbps_is_rejected() {
    let e = Framer::new(Rate::Dbpsk1, Preamble::Short).err();
    assert_eq!(e, Some(Error::ShortPreambleAt1Mbps(Rate::Dbpsk1)));

    for rate in [Rate::Dqpsk2, Rate::Cck5_5, Rate::Cck11] {
        assert!(Framer::new(rate, Preamble::Short).is_ok());
    }
}

#[test]
fn long_preamble_frame() -> Result<()> {
    let psdu: Vec<u8> = (0..100).collect();
    let framer = Framer::new(Rate::Dqpsk2, Preamble::Long)?;
    framer.submit(&psdu);

    let mut mock = Mocker::new(framer);
    mock.run()?;
    let (out, tags) = mock.output();

    assert_eq!(out.len(), 18 + 6 + 100);
    assert!(out[0..16].iter().all(|b| *b == 0xFF));
    assert_eq!(&out[16..18], &[0xA0, 0xF3]);
    // LENGTH 400 µs, CRC over 14 00 90 01
    assert_eq!(&out[18..24], &[0x14, 0x00, 0x90, 0x01, 0x47, 0x45]);
    assert_eq!(&out[24..], psdu.as_slice());

    assert_eq!(
        tags,
        &[
            tag(0, Tag::FrameStart(124)),
            tag(0, Tag::RateChange(Rate::Dbpsk1)),
            tag(24, Tag::RateChange(Rate::Dqpsk2)),
        ]
    );
    Ok(())
}

#[test]
fn short_preamble_frame_with_length_extension() -> Result<()> {
    let framer = Framer::new(Rate::Cck11, Preamble::Short)?;
    framer.submit(&[0xAA, 0xBB, 0xCC]);

    let mut mock = Mocker::new(framer);
    mock.run()?;
    let (out, tags) = mock.output();

    let crc = crc16(&[0x6E, 0x80, 0x03, 0x00]).to_le_bytes();
    assert_eq!(
        out,
        &[
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xCF, 0x05, // preamble
            0x6E, 0x80, 0x03, 0x00, crc[0], crc[1], // header
            0xAA, 0xBB, 0xCC,
        ]
    );
    assert_eq!(
        tags,
        &[
            tag(0, Tag::FrameStart(18)),
            tag(0, Tag::RateChange(Rate::Dbpsk1)),
            tag(9, Tag::RateChange(Rate::Dqpsk2)),
            tag(15, Tag::RateChange(Rate::Cck11)),
        ]
    );
    Ok(())
}

#[test]
fn empty_psdu() -> Result<()> {
    let framer = Framer::new(Rate::Cck5_5, Preamble::Long)?;
    framer.submit(&[]);

    let mut mock = Mocker::new(framer);
    mock.run()?;
    let (out, tags) = mock.output();

    let header = PlcpHeader::new(Rate::Cck5_5, 0);
    assert_eq!(header.length(), 0);
    assert_eq!(out.len(), 24);
    assert_eq!(&out[18..], &header.to_bytes());
    assert_eq!(tags.len(), 3);
    assert_eq!(tags[2], tag(24, Tag::RateChange(Rate::Cck5_5)));
    Ok(())
}

#[test]
fn frames_are_sequential_and_tagged_once() -> Result<()> {
    let framer = Framer::new(Rate::Cck11, Preamble::Long)?;
    framer.submit(&[1; 10]);
    framer.submit(&[2; 20]);

    let mut mock = Mocker::with_buffer_size(framer, 5);
    let mut calls = 0;
    loop {
        let (_, produced) = mock.process(0, 5)?;
        if produced == 0 {
            break;
        }
        calls += 1;
    }
    assert_eq!(calls, (34 + 44usize).div_ceil(5));

    let (out, tags) = mock.take_output();
    assert_eq!(out.len(), 34 + 44);
    assert!(out[24..34].iter().all(|b| *b == 1));
    assert!(out[34 + 24..].iter().all(|b| *b == 2));

    let starts: Vec<&ItemTag> = tags
        .iter()
        .filter(|t| matches!(t.tag, Tag::FrameStart(_)))
        .collect();
    assert_eq!(starts.len(), 2);
    assert_eq!(*starts[0], tag(0, Tag::FrameStart(34)));
    assert_eq!(*starts[1], tag(34, Tag::FrameStart(44)));

    let rates: Vec<&ItemTag> = tags
        .iter()
        .filter(|t| matches!(t.tag, Tag::RateChange(_)))
        .collect();
    assert_eq!(
        rates,
        vec![
            &tag(0, Tag::RateChange(Rate::Dbpsk1)),
            &tag(24, Tag::RateChange(Rate::Cck11)),
            &tag(34, Tag::RateChange(Rate::Dbpsk1)),
            &tag(58, Tag::RateChange(Rate::Cck11)),
        ]
    );
    Ok(())
}

#[test]
fn oversized_psdu_is_dropped() -> Result<()> {
    let framer = Framer::new(Rate::Cck11, Preamble::Long)?;
    framer.submit(&vec![0; 4096]);
    assert_eq!(framer.handle().queued(), 0);

    framer.submit(&vec![0; 4095]);
    assert_eq!(framer.handle().queued(), 1);
    Ok(())
}

#[test]
fn finishes_after_queue_drains() -> Result<()> {
    let framer = Framer::new(Rate::Dqpsk2, Preamble::Short)?;
    let handle = framer.handle();
    handle.submit(b"last frame");
    handle.finish();

    let mut mock = Mocker::with_buffer_size(framer, 4);
    mock.process(0, 4)?;
    assert!(!mock.finished());
    mock.run()?;
    assert!(mock.finished());
    assert_eq!(mock.output().0.len(), 9 + 6 + 10);
    assert_eq!(handle.queued(), 0);
    Ok(())
}

#[test]
fn concurrent_submit() -> Result<()> {
    let framer = Framer::new(Rate::Cck5_5, Preamble::Long)?;
    let mut mock = Mocker::with_buffer_size(framer, 64);

    let producers: Vec<_> = (0..4u8)
        .map(|id| {
            let handle = mock.kernel().handle();
            thread::spawn(move || {
                for n in 0..25u8 {
                    handle.submit(&vec![id * 32 + n; n as usize + 1]);
                }
            })
        })
        .collect();

    for p in producers {
        p.join().expect("producer panicked");
    }
    mock.kernel().handle().finish();
    mock.run()?;
    assert!(mock.finished());

    let (out, tags) = mock.take_output();
    let starts: Vec<(usize, usize)> = tags
        .iter()
        .filter_map(|t| match t.tag {
            Tag::FrameStart(len) => Some((t.index, len)),
            _ => None,
        })
        .collect();
    assert_eq!(starts.len(), 100);

    let mut expected = 0;
    for (index, len) in starts {
        assert_eq!(index, expected);
        let psdu = &out[index + 24..index + len];
        assert!(!psdu.is_empty());
        assert!(psdu.iter().all(|b| *b == psdu[0]));
        assert_eq!(psdu.len(), (psdu[0] % 32) as usize + 1);
        expected += len;
    }
    assert_eq!(expected, out.len());
    Ok(())
}
