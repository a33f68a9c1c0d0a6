use anyhow::Result;
use ieee80211b::Rate;
use ieee80211b::blocks::Mode;
use ieee80211b::blocks::Scrambler;
use ieee80211b::runtime::ItemTag;
use ieee80211b::runtime::Kernel;
use ieee80211b::runtime::Mocker;
use ieee80211b::runtime::StreamIo;
use ieee80211b::runtime::Tag;
use ieee80211b::runtime::WorkIo;
use ieee80211b::runtime::copy_tag_propagation;
use rand::Rng;
use rand::distr::Uniform;

/// Adds one to every byte.
struct Increment;

impl Kernel for Increment {
    type Input = u8;
    type Output = u8;

    fn work(&mut self, _io: &mut WorkIo, sio: &mut StreamIo<'_, u8, u8>) -> Result<()> {
        let input = sio.input();
        let out = sio.output();
        let n = std::cmp::min(input.len(), out.len());
        for (o, i) in out.iter_mut().zip(input.iter()) {
            *o = i.wrapping_add(1);
        }
        sio.consume(n);
        sio.produce(n);
        copy_tag_propagation(sio);
        Ok(())
    }
}

#[test]
fn multi_input_mock() -> Result<()> {
    let input: Vec<u8> = rand::rng()
        .sample_iter(Uniform::<u8>::new(0, 255)?)
        .take(128)
        .collect();

    let mut mocker = Mocker::with_buffer_size(Increment, 50);
    mocker.input(input[..64].to_vec());
    mocker.run()?;
    mocker.input(input[64..].to_vec());
    mocker.run()?;
    let (output, _) = mocker.output();

    assert_eq!(input.len(), output.len());
    for (a, b) in input.iter().zip(output.iter()) {
        assert_eq!(a + 1, *b);
    }
    Ok(())
}

#[test]
fn tags_through_mock() -> Result<()> {
    let mut mock = Mocker::with_buffer_size(Scrambler::new(Mode::Scramble), 100);
    let input = vec![0u8; 1024];
    let tags = vec![
        ItemTag {
            index: 0,
            tag: Tag::FrameStart(256),
        },
        ItemTag {
            index: 256,
            tag: Tag::RateChange(Rate::Cck11),
        },
        ItemTag {
            index: 555,
            tag: Tag::FrameStart(469),
        },
    ];
    mock.input_with_tags(input.clone(), tags.clone());
    mock.run()?;

    let (output, out_tags) = mock.output();
    assert_eq!(input.len(), output.len());
    assert_eq!(out_tags, tags.as_slice());

    // tags of appended input are relative to the appended data
    mock.input_with_tags(
        vec![0; 10],
        vec![ItemTag {
            index: 3,
            tag: Tag::FrameStart(7),
        }],
    );
    mock.run()?;
    let (output, out_tags) = mock.output();
    assert_eq!(output.len(), 1034);
    assert_eq!(out_tags.last().map(|t| t.index), Some(1027));
    Ok(())
}

#[test]
fn process_respects_windows() -> Result<()> {
    let mut mock = Mocker::new(Increment);
    mock.input_with_tags(
        vec![1, 2, 3, 4, 5],
        vec![ItemTag {
            index: 3,
            tag: Tag::FrameStart(2),
        }],
    );

    assert_eq!(mock.process(2, 10)?, (2, 2));
    assert_eq!(mock.process(10, 1)?, (1, 1));
    assert_eq!(mock.pending_input(), 2);
    assert!(mock.output().1.is_empty());

    assert_eq!(mock.process(10, 10)?, (2, 2));
    let (out, tags) = mock.output();
    assert_eq!(out, &[2, 3, 4, 5, 6]);
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].index, 3);
    Ok(())
}

#[test]
fn take_output_keeps_future_tags() -> Result<()> {
    struct Tagger;

    impl Kernel for Tagger {
        type Input = ();
        type Output = u8;

        fn work(&mut self, io: &mut WorkIo, sio: &mut StreamIo<'_, (), u8>) -> Result<()> {
            sio.output()[0] = 7;
            sio.produce(1);
            sio.add_tag(3, Tag::RateChange(Rate::Dqpsk2));
            io.finished = true;
            Ok(())
        }
    }

    let mut mock = Mocker::new(Tagger);
    mock.run()?;
    assert!(mock.finished());

    let (data, tags) = mock.take_output();
    assert_eq!(data, vec![7]);
    assert!(tags.is_empty());
    assert_eq!(mock.output().1[0].index, 2);
    Ok(())
}
